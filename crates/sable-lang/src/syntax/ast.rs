use std::rc::Rc;

/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

// ─── Functions ───────────────────────────────────────────────────────────────

/// `func name(p: T = default, …) -> T { … }`
///
/// Bodies are reference-counted so a runtime `Function` can point at the
/// parse tree without copying it.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_ty: Option<Type>,
    pub body: Rc<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub default: Option<Expr>,
    pub span: Span,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `let x: int = 3;` or `let x: float;` or `let x = 3;`
    VarDecl(VarDecl),
    /// `x = e;`, `x += e;` …
    Assign(Assign),
    /// `xs[i] = e;`, `xs[i] -= e;` …
    IndexAssign(IndexAssign),
    /// `func f(…) { … }`
    FnDecl(Rc<FnDecl>),
    /// `if (c) { } else { }`
    If(IfStmt),
    /// `while (c) { }`
    While(WhileStmt),
    /// `match e { case p => stmt … }`
    Match(MatchStmt),
    /// `return e;` or bare `return;`
    Return(Option<Expr>, Span),
    /// `{ … }`
    Block(Vec<Stmt>, Span),
    /// A standalone expression used as a statement (e.g. a call).
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<Type>,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    /// The binary operator a compound assignment applies, if any.
    pub fn binop(self) -> Option<BinOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub target: String,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IndexAssign {
    pub target: String,
    pub index: Expr,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Vec<Stmt>,
    /// `else if` chains nest as a single `Stmt::If` inside this block.
    pub else_block: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MatchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<MatchCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Box<Stmt>,
    pub span: Span,
}

// ─── Patterns ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `0`, `-1.5`, `"on"`, `true`
    Literal(Literal),
    /// `_`
    Wildcard,
    /// `n`: matches anything and binds it.
    Bind(String),
    /// `[a, 0, _]`: positional, same length.
    Array(Vec<Pattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    StringLit(String, Span),
    Ident(String, Span),

    /// `a + b`, `a == b`, etc.
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },

    /// `not x`, `-x`
    UnOp {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// `Int(x)`, `String(x)`
    Cast {
        expr: Box<Expr>,
        ty: Type,
        span: Span,
    },

    /// `name(args)`
    Call {
        callee: String,
        args: Vec<Expr>,
        span: Span,
    },

    /// `expr[index]`
    Index {
        expr: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },

    /// `subject.op(args, name: val)`: the operation is a parsed tag, never raw text.
    CollectionOp {
        subject: Box<Expr>,
        op: OpTag,
        args: Vec<Expr>,
        named_args: Vec<(String, Expr)>,
        span: Span,
    },

    /// `[1, 2, 3]`: becomes an array or a list depending on the declared type.
    ArrayLit(Vec<Expr>, Span),

    /// `x => x * x`
    Lambda {
        param: String,
        body: Rc<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Int(_, s)         => s,
            Expr::Float(_, s)       => s,
            Expr::Bool(_, s)        => s,
            Expr::StringLit(_, s)   => s,
            Expr::Ident(_, s)       => s,
            Expr::BinOp { span, .. }        => span,
            Expr::UnOp { span, .. }         => span,
            Expr::Cast { span, .. }         => span,
            Expr::Call { span, .. }         => span,
            Expr::Index { span, .. }        => span,
            Expr::CollectionOp { span, .. } => span,
            Expr::ArrayLit(_, s)    => s,
            Expr::Lambda { span, .. }       => span,
        }
    }
}

// ─── Operators ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add, Sub, Mul, Div, Mod,
    Eq, NotEq,
    Lt, LtEq, Gt, GtEq,
    And, Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add   => "+",   BinOp::Sub  => "-",
            BinOp::Mul   => "*",   BinOp::Div  => "/",  BinOp::Mod => "%",
            BinOp::Eq    => "==",  BinOp::NotEq => "!=",
            BinOp::Lt    => "<",   BinOp::LtEq => "<=",
            BinOp::Gt    => ">",   BinOp::GtEq => ">=",
            BinOp::And   => "and", BinOp::Or   => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnOp {
    Neg,
    Not,
}

/// Collection / matrix method-call operations recognised by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpTag {
    // mutating
    Sort,
    Append,
    Remove,
    // derived statistics
    Mean,
    Median,
    Variance,
    Stddev,
    Linreg,
    // derived transforms
    Map,
    Filter,
    Rotate,
    Shift,
    // derived matrix algebra
    Add,
    Multiply,
    Invert,
    Transpose,
}

impl OpTag {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sort"      => OpTag::Sort,
            "append"    => OpTag::Append,
            "remove"    => OpTag::Remove,
            "mean"      => OpTag::Mean,
            "median"    => OpTag::Median,
            "variance"  => OpTag::Variance,
            "stddev"    => OpTag::Stddev,
            "linreg"    => OpTag::Linreg,
            "map"       => OpTag::Map,
            "filter"    => OpTag::Filter,
            "rotate"    => OpTag::Rotate,
            "shift"     => OpTag::Shift,
            "add"       => OpTag::Add,
            "multiply"  => OpTag::Multiply,
            "invert"    => OpTag::Invert,
            "transpose" => OpTag::Transpose,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            OpTag::Sort      => "sort",
            OpTag::Append    => "append",
            OpTag::Remove    => "remove",
            OpTag::Mean      => "mean",
            OpTag::Median    => "median",
            OpTag::Variance  => "variance",
            OpTag::Stddev    => "stddev",
            OpTag::Linreg    => "linreg",
            OpTag::Map       => "map",
            OpTag::Filter    => "filter",
            OpTag::Rotate    => "rotate",
            OpTag::Shift     => "shift",
            OpTag::Add       => "add",
            OpTag::Multiply  => "multiply",
            OpTag::Invert    => "invert",
            OpTag::Transpose => "transpose",
        }
    }

    /// Mutating operations change the subject in place; all others bind
    /// their result as `<subject>_<op>`.
    pub fn is_mutating(self) -> bool {
        matches!(self, OpTag::Sort | OpTag::Append | OpTag::Remove)
    }

    /// Number of positional arguments the operation takes.
    pub fn arity(self) -> usize {
        match self {
            OpTag::Sort | OpTag::Mean | OpTag::Median | OpTag::Variance
            | OpTag::Stddev | OpTag::Invert | OpTag::Transpose => 0,
            OpTag::Append | OpTag::Remove | OpTag::Linreg | OpTag::Map | OpTag::Filter
            | OpTag::Rotate | OpTag::Shift | OpTag::Add | OpTag::Multiply => 1,
        }
    }
}

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Array(Box<Type>),
    List(Box<Type>),
    Func,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int        => write!(f, "int"),
            Type::Float      => write!(f, "float"),
            Type::Bool       => write!(f, "bool"),
            Type::String     => write!(f, "string"),
            Type::Array(t)   => write!(f, "array<{t}>"),
            Type::List(t)    => write!(f, "list<{t}>"),
            Type::Func       => write!(f, "func"),
        }
    }
}
