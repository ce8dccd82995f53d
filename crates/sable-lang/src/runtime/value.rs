use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::builtins::Builtin;
use crate::builtins::matrix::Matrix;
use crate::runtime::environment::Environment;
use crate::syntax::ast::{Expr, FnDecl};

/// Shared, mutable backing store of an array or list.
pub type Seq = Rc<RefCell<Vec<Value>>>;

pub fn seq(items: Vec<Value>) -> Seq {
    Rc::new(RefCell::new(items))
}

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// Homogeneous sequence; element types are checked against a declared `array<T>`.
    Array(Seq),
    /// Heterogeneous-tolerant sequence supporting `append` / `remove`.
    List(Seq),
    /// Dense row-major matrix, produced only by matrix operations.
    Matrix(Rc<Matrix>),
    Function(Rc<Function>),
    Builtin(&'static Builtin),
    Unit,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(seq(items))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(seq(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_)      => "int",
            Value::Float(_)    => "float",
            Value::Bool(_)     => "bool",
            Value::Str(_)      => "string",
            Value::Array(_)    => "array",
            Value::List(_)     => "list",
            Value::Matrix(_)   => "matrix",
            Value::Function(_) => "func",
            Value::Builtin(_)  => "builtin",
            Value::Unit        => "unit",
        }
    }

    /// The backing store of an array or list.
    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Value::Array(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// A new sequence of the same kind (array stays array, list stays list).
    pub fn same_kind(&self, items: Vec<Value>) -> Value {
        match self {
            Value::List(_) => Value::list(items),
            _ => Value::array(items),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n)   => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Builtin(_))
    }

    /// Whether `items` is this sequence or is nested anywhere inside it.
    pub fn contains_seq(&self, items: &Seq) -> bool {
        match self.as_seq() {
            Some(own) => Rc::ptr_eq(own, items) || own.borrow().iter().any(|v| v.contains_seq(items)),
            None => false,
        }
    }

    /// Textual form used inside containers, where strings are quoted.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n)   => write!(f, "{n}"),
            // Debug keeps a trailing `.0` on integral floats
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b)  => write!(f, "{b}"),
            Value::Str(s)   => write!(f, "{s}"),
            Value::Array(items) | Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Matrix(m)   => write!(f, "{m}"),
            Value::Function(g) => write!(f, "<func {}>", g.name()),
            Value::Builtin(b)  => write!(f, "<builtin {}>", b.name),
            Value::Unit        => write!(f, "unit"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n)   => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Bool(b)  => write!(f, "Bool({b})"),
            Value::Str(s)   => write!(f, "Str({s:?})"),
            Value::Array(items) => f.debug_tuple("Array").field(&items.borrow()).finish(),
            Value::List(items)  => f.debug_tuple("List").field(&items.borrow()).finish(),
            Value::Matrix(m)    => write!(f, "Matrix({m})"),
            // closures are not printed: the captured environment may contain the function itself
            Value::Function(g)  => write!(f, "Function({})", g.name()),
            Value::Builtin(b)   => write!(f, "Builtin({})", b.name),
            Value::Unit         => write!(f, "Unit"),
        }
    }
}

// ─── Functions ───────────────────────────────────────────────────────────────

/// What a user-level function executes when called.
pub enum Callable {
    /// `func name(…) { … }`
    Declared(Rc<FnDecl>),
    /// `x => expr`
    Lambda { param: String, body: Rc<Expr> },
}

/// A user function plus the environment it was created in.
///
/// The environment is held by reference: later changes to outer bindings
/// are visible when the function runs.
pub struct Function {
    pub callable: Callable,
    pub closure: Environment,
}

impl Function {
    pub fn name(&self) -> &str {
        match &self.callable {
            Callable::Declared(decl) => &decl.name,
            Callable::Lambda { .. }  => "<lambda>",
        }
    }
}
