//! Tree-walking evaluator. Runs a `Program` against a chain of
//! `Environment` frames, handing `print` / `play` output to the sinks.
//! Native functions live in `builtins`; the interpreter only dispatches.

use std::mem;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::builtins::collections;
use crate::builtins::matrix::Matrix;
use crate::builtins::{self, Host, seq_arg, stats};
use crate::error::RuntimeError;
use crate::runtime::coerce::{cast, check_assignable, check_element, default_for};
use crate::runtime::environment::Environment;
use crate::runtime::ops;
use crate::runtime::pattern;
use crate::runtime::stack::ensure_sufficient_stack;
use crate::runtime::value::{Callable, Function, Seq, Value};
use crate::sink::{LogNoteSink, NoteSink, StdoutSink, TextSink};
use crate::syntax::ast::{
    Assign, BinOp, Expr, FnDecl, IndexAssign, MatchStmt, OpTag, Program, Span, Stmt, Type,
    VarDecl,
};

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Nested user-function calls allowed before `RecursionLimit`.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: 10_000 }
    }
}

// ─── Interpreter ──────────────────────────────────────────────────────────────

pub struct Interpreter {
    /// Program-level frame; its parent holds the builtins.
    globals: Environment,
    env: Environment,
    text: Box<dyn TextSink>,
    notes: Box<dyn NoteSink>,
    config: InterpreterConfig,
    return_value: Option<Value>,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let prelude = Environment::root();
        for b in builtins::all() {
            prelude.define(b.name, Value::Builtin(b));
        }
        let globals = prelude.child();
        Self {
            env: globals.clone(),
            globals,
            text: Box::new(StdoutSink),
            notes: Box::new(LogNoteSink),
            config: InterpreterConfig::default(),
            return_value: None,
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_text_sink(mut self, sink: impl TextSink + 'static) -> Self {
        self.text = Box::new(sink);
        self
    }

    pub fn with_note_sink(mut self, sink: impl NoteSink + 'static) -> Self {
        self.notes = Box::new(sink);
        self
    }

    /// Value bound to `name` at program level (or in the prelude).
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name)
    }

    fn err(&self, line: usize, msg: impl Into<String>) -> RuntimeError {
        RuntimeError::type_error(line, msg)
    }

    // ─── Entry point ──────────────────────────────────────────────────────────

    /// Run every top-level statement in order. The result is the value of
    /// the last statement, or the operand of a top-level `return`.
    /// Bindings persist in `globals` across calls.
    pub fn evaluate(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        let _span = tracing::debug_span!("evaluate", stmts = program.stmts.len()).entered();
        self.env = self.globals.clone();
        self.return_value = None;
        self.depth = 0;

        let mut last = Value::Unit;
        for stmt in &program.stmts {
            last = self.exec_stmt(stmt)?;
            if let Some(v) = self.return_value.take() {
                return Ok(v);
            }
        }
        Ok(last)
    }

    // ─── Statement executor ───────────────────────────────────────────────────

    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Value, RuntimeError> {
        match stmt {
            Stmt::VarDecl(v) => {
                self.exec_var_decl(v)?;
                Ok(Value::Unit)
            }

            Stmt::Assign(a) => {
                self.exec_assign(a)?;
                Ok(Value::Unit)
            }

            Stmt::IndexAssign(a) => {
                self.exec_index_assign(a)?;
                Ok(Value::Unit)
            }

            Stmt::FnDecl(decl) => {
                self.declare_function(decl)?;
                Ok(Value::Unit)
            }

            Stmt::If(i) => {
                let branch = if self.condition(&i.condition, "if")? {
                    Some(&i.then_block)
                } else {
                    i.else_block.as_ref()
                };
                match branch {
                    Some(block) => self.exec_block(block),
                    None => Ok(Value::Unit),
                }
            }

            Stmt::While(w) => {
                while self.condition(&w.condition, "while")? {
                    self.exec_block(&w.body)?;
                    if self.return_value.is_some() { break; }
                }
                Ok(Value::Unit)
            }

            Stmt::Match(m) => self.exec_match(m),

            Stmt::Return(expr, _) => {
                let val = match expr {
                    Some(e) => self.eval_expr(e)?,
                    None    => Value::Unit,
                };
                self.return_value = Some(val);
                Ok(Value::Unit)
            }

            Stmt::Block(stmts, _) => self.exec_block(stmts),

            Stmt::Expr(e) => self.eval_expr(e),
        }
    }

    /// Run `stmts` until one of them sets the return flag; yields the last
    /// statement's value.
    fn exec_stmts(&mut self, stmts: &[Stmt]) -> Result<Value, RuntimeError> {
        let mut last = Value::Unit;
        for s in stmts {
            last = self.exec_stmt(s)?;
            if self.return_value.is_some() { break; }
        }
        Ok(last)
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Value, RuntimeError> {
        let scope = self.env.child();
        self.exec_in(scope, stmts)
    }

    /// Run `stmts` with `scope` as the innermost frame, restoring the
    /// previous frame afterwards whether or not evaluation failed.
    fn exec_in(&mut self, scope: Environment, stmts: &[Stmt]) -> Result<Value, RuntimeError> {
        trace!(depth = scope.depth(), "enter scope");
        let saved = mem::replace(&mut self.env, scope);
        let result = self.exec_stmts(stmts);
        self.env = saved;
        result
    }

    fn condition(&mut self, expr: &Expr, what: &str) -> Result<bool, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(self.err(expr.span().line, format!(
                "`{what}` condition must be bool, got {}", other.type_name()
            ))),
        }
    }

    fn exec_var_decl(&mut self, v: &VarDecl) -> Result<(), RuntimeError> {
        let line = v.span.line;
        let val = match (&v.initializer, &v.ty) {
            (Some(e), ty)     => self.eval_hinted(e, ty.as_ref())?,
            (None, Some(ty))  => default_for(ty),
            (None, None)      => Value::Unit,
        };
        let val = match &v.ty {
            Some(ty) => check_assignable(ty, val, line)?,
            None     => val,
        };
        self.env.define_typed(v.name.as_str(), val, v.ty.clone());
        Ok(())
    }

    fn exec_assign(&mut self, a: &Assign) -> Result<(), RuntimeError> {
        let line = a.span.line;
        let declared = self.env.declared_type(&a.target);
        let val = match a.op.binop() {
            None => self.eval_hinted(&a.value, declared.as_ref())?,
            Some(op) => {
                let current = self.env.get(&a.target).ok_or_else(|| RuntimeError::name(
                    line, format!("undefined variable `{}`", a.target)
                ))?;
                let rhs = self.eval_expr(&a.value)?;
                ops::binary(op, &current, &rhs, line)?
            }
        };
        let val = match &declared {
            Some(ty) => check_assignable(ty, val, line)?,
            None     => val,
        };
        if !self.env.assign(&a.target, val) {
            trace!(name = %a.target, "assignment declared a new binding");
        }
        Ok(())
    }

    fn exec_index_assign(&mut self, a: &IndexAssign) -> Result<(), RuntimeError> {
        let line = a.span.line;
        let binding = self.env.lookup(&a.target).ok_or_else(|| RuntimeError::name(
            line, format!("undefined variable `{}`", a.target)
        ))?;
        let index = self.eval_expr(&a.index)?;
        let rhs = self.eval_expr(&a.value)?;

        let Some(items) = binding.value.as_seq() else {
            return Err(self.err(line, format!(
                "cannot assign into an element of {}", binding.value.type_name()
            )));
        };
        let i = index_of(&index, items.borrow().len(), line)?;
        let val = match a.op.binop() {
            None => rhs,
            Some(op) => {
                let current = items.borrow()[i].clone();
                ops::binary(op, &current, &rhs, line)?
            }
        };
        let val = check_element(binding.ty.as_ref(), val, line)?;
        reject_self_insert(items, &val, line)?;
        items.borrow_mut()[i] = val;
        Ok(())
    }

    fn declare_function(&mut self, decl: &Rc<FnDecl>) -> Result<(), RuntimeError> {
        if let Some(Value::Function(_)) = self.env.get_local(&decl.name) {
            return Err(RuntimeError::declaration(decl.span.line, format!(
                "function `{}` is already defined in this scope", decl.name
            )));
        }
        debug!(function = %decl.name, params = decl.params.len(), "declare");
        let f = Function {
            callable: Callable::Declared(Rc::clone(decl)),
            closure: self.env.clone(),
        };
        self.env.define(decl.name.as_str(), Value::Function(Rc::new(f)));
        Ok(())
    }

    fn exec_match(&mut self, m: &MatchStmt) -> Result<Value, RuntimeError> {
        let value = self.eval_expr(&m.scrutinee)?;
        for case in &m.cases {
            let mut binds = Vec::new();
            if pattern::matches(&case.pattern, &value, &mut binds) {
                let scope = self.env.child();
                for (name, v) in binds {
                    scope.define(name, v);
                }
                return self.exec_in(scope, std::slice::from_ref(case.body.as_ref()));
            }
        }
        Err(RuntimeError::no_match(m.span.line, format!("no case matched {value}")))
    }

    // ─── Expression evaluator ─────────────────────────────────────────────────

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n, _)       => Ok(Value::Int(*n)),
            Expr::Float(x, _)     => Ok(Value::Float(*x)),
            Expr::Bool(b, _)      => Ok(Value::Bool(*b)),
            Expr::StringLit(s, _) => Ok(Value::Str(s.clone())),

            Expr::Ident(name, span) => self.env.get(name).ok_or_else(|| RuntimeError::name(
                span.line, format!("undefined variable `{name}`")
            )),

            Expr::BinOp { left, op: op @ (BinOp::And | BinOp::Or), right, span } => {
                let l = self.eval_expr(left)?;
                let Value::Bool(lb) = l else {
                    return Err(self.err(span.line, format!(
                        "`{}` requires bool operands, got {}", op.symbol(), l.type_name()
                    )));
                };
                if (*op == BinOp::And) != lb {
                    return Ok(Value::Bool(lb));
                }
                match self.eval_expr(right)? {
                    Value::Bool(rb) => Ok(Value::Bool(rb)),
                    other => Err(self.err(span.line, format!(
                        "`{}` requires bool operands, got {}", op.symbol(), other.type_name()
                    ))),
                }
            }

            Expr::BinOp { left, op, right, span } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                ops::binary(*op, &l, &r, span.line)
            }

            Expr::UnOp { op, operand, span } => {
                let v = self.eval_expr(operand)?;
                ops::unary(*op, &v, span.line)
            }

            Expr::Cast { expr, ty, span } => {
                let v = self.eval_expr(expr)?;
                cast(&v, ty, span.line)
            }

            Expr::Call { callee, args, span } => self.eval_call(callee, args, span),

            Expr::Index { expr, index, span } => {
                let coll = self.eval_expr(expr)?;
                let idx  = self.eval_expr(index)?;
                index_value(&coll, &idx, span.line)
            }

            Expr::CollectionOp { subject, op, args, named_args, span } => {
                self.eval_collection_op(subject, *op, args, named_args, span)
            }

            Expr::ArrayLit(..) => self.eval_hinted(expr, None),

            Expr::Lambda { param, body, .. } => {
                let f = Function {
                    callable: Callable::Lambda { param: param.clone(), body: Rc::clone(body) },
                    closure: self.env.clone(),
                };
                Ok(Value::Function(Rc::new(f)))
            }
        }
    }

    /// Evaluate `expr` knowing the type it will be stored as. Only array
    /// literals care: under `list<T>` they build a `List`, at any depth.
    fn eval_hinted(&mut self, expr: &Expr, ty: Option<&Type>) -> Result<Value, RuntimeError> {
        let Expr::ArrayLit(items, _) = expr else {
            return self.eval_expr(expr);
        };
        let (is_list, inner) = match ty {
            Some(Type::List(t))  => (true, Some(t.as_ref())),
            Some(Type::Array(t)) => (false, Some(t.as_ref())),
            _ => (false, None),
        };
        let mut vals = Vec::with_capacity(items.len());
        for e in items {
            vals.push(self.eval_hinted(e, inner)?);
        }
        Ok(if is_list { Value::list(vals) } else { Value::array(vals) })
    }

    // ─── Call dispatch ────────────────────────────────────────────────────────

    fn eval_call(&mut self, callee: &str, args: &[Expr], span: &Span) -> Result<Value, RuntimeError> {
        let f = self.env.get(callee).ok_or_else(|| RuntimeError::name(
            span.line, format!("undefined function `{callee}`")
        ))?;
        // array literals passed to `list<T>` parameters become lists
        let decl = match &f {
            Value::Function(func) => match &func.callable {
                Callable::Declared(decl) => Some(Rc::clone(decl)),
                Callable::Lambda { .. } => None,
            },
            _ => None,
        };
        let mut arg_vals = Vec::with_capacity(args.len());
        for (i, a) in args.iter().enumerate() {
            let hint = decl.as_ref().and_then(|d| d.params.get(i)).map(|p| &p.ty);
            arg_vals.push(self.eval_hinted(a, hint)?);
        }
        self.invoke(&f, arg_vals, span.line)
    }

    fn invoke(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(f) => self.call_function(f, args, line),
            Value::Builtin(b) => {
                b.check_arity(args.len(), line)?;
                (b.call)(self, &args, line)
            }
            other => Err(self.err(line, format!("{} is not callable", other.type_name()))),
        }
    }

    fn call_function(&mut self, f: &Rc<Function>, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::recursion_limit(line, self.config.max_call_depth));
        }
        debug!(function = f.name(), depth = self.depth, argc = args.len(), "call");
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.enter_function(f, args, line));
        self.depth -= 1;
        result
    }

    /// Bind arguments in a fresh child of the closure frame and run the
    /// body there. The caller's frame and return flag are restored after.
    fn enter_function(&mut self, f: &Function, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        let frame = f.closure.child();
        trace!(depth = frame.depth(), function = f.name(), "enter call frame");
        let saved_env = mem::replace(&mut self.env, frame);
        let saved_ret = self.return_value.take();

        let result = match &f.callable {
            Callable::Declared(decl) => self.run_declared(decl, args, line),
            Callable::Lambda { param, body } => self.run_lambda(param, body, args, line),
        };

        self.return_value = saved_ret;
        self.env = saved_env;
        result
    }

    fn run_declared(&mut self, decl: &FnDecl, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        if args.len() > decl.params.len() {
            return Err(RuntimeError::arity(line, format!(
                "`{}` expects at most {} args, got {}", decl.name, decl.params.len(), args.len()
            )));
        }
        let mut args = args.into_iter();
        for p in &decl.params {
            let val = match (args.next(), &p.default) {
                (Some(v), _)       => v,
                (None, Some(expr)) => self.eval_hinted(expr, Some(&p.ty))?,
                (None, None) => return Err(RuntimeError::arity(line, format!(
                    "missing argument `{}` in call to `{}`", p.name, decl.name
                ))),
            };
            let val = check_assignable(&p.ty, val, line)?;
            self.env.define_typed(p.name.as_str(), val, Some(p.ty.clone()));
        }

        let last = self.exec_stmts(&decl.body)?;
        Ok(self.return_value.take().unwrap_or(last))
    }

    fn run_lambda(&mut self, param: &str, body: &Expr, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        let argc = args.len();
        let mut args = args.into_iter();
        let (Some(arg), None) = (args.next(), args.next()) else {
            return Err(RuntimeError::arity(line, format!(
                "lambda expects 1 arg, got {argc}"
            )));
        };
        self.env.define(param, arg);
        self.eval_expr(body)
    }

    // ─── Collection operations ────────────────────────────────────────────────

    fn eval_collection_op(
        &mut self,
        subject: &Expr,
        op: OpTag,
        args: &[Expr],
        named_args: &[(String, Expr)],
        span: &Span,
    ) -> Result<Value, RuntimeError> {
        let line = span.line;
        let target = self.eval_expr(subject)?;
        if args.len() != op.arity() {
            return Err(RuntimeError::arity(line, format!(
                "`.{}` expects {} args, got {}", op.name(), op.arity(), args.len()
            )));
        }
        let mut arg_vals = Vec::with_capacity(args.len());
        for a in args {
            arg_vals.push(self.eval_expr(a)?);
        }
        let mutate = self.mutate_flag(op, named_args, line)?;
        let declared = match subject {
            Expr::Ident(name, _) => self.env.declared_type(name),
            _ => None,
        };

        let result = self.apply_op(op, &target, &arg_vals, mutate, declared.as_ref(), line)?;

        if !op.is_mutating() && !mutate {
            if let Expr::Ident(name, _) = subject {
                self.bind_derived(name, op, &result);
            }
        }
        Ok(result)
    }

    /// `mutate:` is the only named argument, and only `map` / `filter`
    /// accept it.
    fn mutate_flag(&mut self, op: OpTag, named: &[(String, Expr)], line: usize) -> Result<bool, RuntimeError> {
        let mut mutate = false;
        for (name, expr) in named {
            if name != "mutate" || !matches!(op, OpTag::Map | OpTag::Filter) {
                return Err(RuntimeError::arity(line, format!(
                    "`.{}` does not take a `{name}` argument", op.name()
                )));
            }
            mutate = match self.eval_expr(expr)? {
                Value::Bool(b) => b,
                other => return Err(self.err(line, format!(
                    "`mutate` must be bool, got {}", other.type_name()
                ))),
            };
        }
        Ok(mutate)
    }

    fn apply_op(
        &mut self,
        op: OpTag,
        target: &Value,
        args: &[Value],
        mutate: bool,
        declared: Option<&Type>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let name = op.name();
        match op {
            OpTag::Sort => {
                let items = seq_of(target, name, line)?;
                collections::sort(&mut items.borrow_mut(), line)?;
                Ok(target.clone())
            }
            OpTag::Append => {
                let items = list_of(target, name, line)?;
                reject_self_insert(items, &args[0], line)?;
                items.borrow_mut().push(args[0].clone());
                Ok(target.clone())
            }
            OpTag::Remove => {
                let items = list_of(target, name, line)?;
                collections::remove(items, &args[0], line)?;
                Ok(target.clone())
            }

            OpTag::Mean     => stats::mean(&seq_arg(target, name, line)?, line).map(Value::Float),
            OpTag::Median   => stats::median(&seq_arg(target, name, line)?, line),
            OpTag::Variance => stats::variance(&seq_arg(target, name, line)?, line).map(Value::Float),
            OpTag::Stddev   => stats::stddev(&seq_arg(target, name, line)?, line).map(Value::Float),
            OpTag::Linreg   => {
                let x = seq_arg(target, name, line)?;
                let y = seq_arg(&args[0], name, line)?;
                Ok(stats::linreg(&x, &y, line)?.to_value())
            }

            OpTag::Map | OpTag::Filter => {
                let items = seq_of(target, name, line)?;
                let snapshot = items.borrow().clone();
                let out = if op == OpTag::Map {
                    collections::map(self, &snapshot, &args[0], line)?
                } else {
                    collections::filter(self, &snapshot, &args[0], line)?
                };
                if mutate {
                    let out = out.into_iter()
                        .map(|v| {
                            reject_self_insert(items, &v, line)?;
                            check_element(declared, v, line)
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    *items.borrow_mut() = out;
                    Ok(target.clone())
                } else {
                    Ok(target.same_kind(out))
                }
            }
            OpTag::Rotate => {
                let items = seq_arg(target, name, line)?;
                let k = collections::int_arg(&args[0], name, line)?;
                Ok(target.same_kind(collections::rotate(&items, k)))
            }
            OpTag::Shift => {
                let items = seq_arg(target, name, line)?;
                let k = collections::int_arg(&args[0], name, line)?;
                Ok(target.same_kind(collections::shift(&items, k)))
            }

            OpTag::Add => {
                let m = Matrix::from_value(target, line)?.add(&Matrix::from_value(&args[0], line)?, line)?;
                Ok(Value::Matrix(Rc::new(m)))
            }
            OpTag::Multiply => {
                let m = Matrix::from_value(target, line)?.multiply(&Matrix::from_value(&args[0], line)?, line)?;
                Ok(Value::Matrix(Rc::new(m)))
            }
            OpTag::Invert => {
                let m = Matrix::from_value(target, line)?.invert(line)?;
                Ok(Value::Matrix(Rc::new(m)))
            }
            OpTag::Transpose => {
                let m = Matrix::from_value(target, line)?.transpose();
                Ok(Value::Matrix(Rc::new(m)))
            }
        }
    }

    /// Store a derived result as `<subject>_<op>` in the innermost frame.
    fn bind_derived(&mut self, subject: &str, op: OpTag, result: &Value) {
        let binding = format!("{subject}_{}", op.name());
        debug!(binding = %binding, "derived result");
        self.env.define(binding, result.clone());

        if op == OpTag::Linreg {
            if let Some(parts) = result.as_seq() {
                let parts = parts.borrow();
                for (suffix, v) in ["slope", "intercept", "r_squared"].iter().zip(parts.iter()) {
                    self.env.define(format!("{subject}_{suffix}"), v.clone());
                }
            }
        }
    }
}

impl Host for Interpreter {
    fn call_value(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
        self.invoke(callee, args, line)
    }

    fn text_sink(&mut self) -> &mut dyn TextSink {
        self.text.as_mut()
    }

    fn note_sink(&mut self) -> &mut dyn NoteSink {
        self.notes.as_mut()
    }
}

// ─── Indexing ─────────────────────────────────────────────────────────────────

fn index_of(idx: &Value, len: usize, line: usize) -> Result<usize, RuntimeError> {
    match idx {
        Value::Int(n) if *n >= 0 && (*n as u64) < len as u64 => Ok(*n as usize),
        Value::Int(n) => Err(RuntimeError::value(line, format!(
            "index {n} out of range for length {len}"
        ))),
        other => Err(RuntimeError::type_error(line, format!(
            "index must be int, got {}", other.type_name()
        ))),
    }
}

fn index_value(coll: &Value, idx: &Value, line: usize) -> Result<Value, RuntimeError> {
    match coll {
        Value::Array(items) | Value::List(items) => {
            let items = items.borrow();
            let i = index_of(idx, items.len(), line)?;
            Ok(items[i].clone())
        }
        Value::Matrix(m) => {
            let i = index_of(idx, m.rows(), line)?;
            Ok(m.row_value(i))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let i = index_of(idx, chars.len(), line)?;
            Ok(Value::Str(chars[i].to_string()))
        }
        other => Err(RuntimeError::type_error(line, format!(
            "cannot index {}", other.type_name()
        ))),
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn seq_of<'v>(v: &'v Value, op: &str, line: usize) -> Result<&'v Seq, RuntimeError> {
    v.as_seq().ok_or_else(|| RuntimeError::type_error(line, format!(
        "`.{op}` requires an array or list, got {}", v.type_name()
    )))
}

/// A sequence may not be stored inside itself.
fn reject_self_insert(items: &Seq, v: &Value, line: usize) -> Result<(), RuntimeError> {
    if v.contains_seq(items) {
        return Err(RuntimeError::value(line, "cannot store a sequence inside itself"));
    }
    Ok(())
}

fn list_of<'v>(v: &'v Value, op: &str, line: usize) -> Result<&'v Seq, RuntimeError> {
    match v {
        Value::List(items) => Ok(items),
        other => Err(RuntimeError::type_error(line, format!(
            "`.{op}` requires a list, got {}", other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;
    use crate::syntax::ast::{AssignOp, Param};

    fn sp() -> Span { Span::new(1, 1) }
    fn int(n: i64) -> Expr { Expr::Int(n, sp()) }
    fn ident(s: &str) -> Expr { Expr::Ident(s.into(), sp()) }

    #[test]
    fn block_scope_is_dropped_after_exit() {
        let mut interp = Interpreter::new();
        let program = Program { stmts: vec![
            Stmt::Block(vec![Stmt::VarDecl(VarDecl {
                name: "inner".into(), ty: None, initializer: Some(int(1)), span: sp(),
            })], sp()),
        ] };
        interp.evaluate(&program).unwrap();
        assert!(interp.global("inner").is_none());
        assert!(interp.env.ptr_eq(&interp.globals));
    }

    #[test]
    fn failed_call_restores_caller_frame() {
        let mut interp = Interpreter::new();
        let decl = Rc::new(FnDecl {
            name: "boom".into(),
            params: vec![],
            return_ty: None,
            body: Rc::new(vec![Stmt::Expr(ident("nope"))]),
            span: sp(),
        });
        let program = Program { stmts: vec![
            Stmt::FnDecl(decl),
            Stmt::Expr(Expr::Call { callee: "boom".into(), args: vec![], span: sp() }),
        ] };
        let err = interp.evaluate(&program).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::NameError);
        assert!(interp.env.ptr_eq(&interp.globals));
        assert_eq!(interp.depth, 0);
    }

    #[test]
    fn defaults_see_earlier_params() {
        let mut interp = Interpreter::new();
        let decl = Rc::new(FnDecl {
            name: "f".into(),
            params: vec![
                Param { name: "a".into(), ty: Type::Int, default: None, span: sp() },
                Param { name: "b".into(), ty: Type::Int, span: sp(), default: Some(Expr::BinOp {
                    left: Box::new(ident("a")), op: BinOp::Mul, right: Box::new(int(2)), span: sp(),
                }) },
            ],
            return_ty: None,
            body: Rc::new(vec![Stmt::Return(Some(ident("b")), sp())]),
            span: sp(),
        });
        let program = Program { stmts: vec![
            Stmt::FnDecl(decl),
            Stmt::Expr(Expr::Call { callee: "f".into(), args: vec![int(21)], span: sp() }),
        ] };
        assert!(matches!(interp.evaluate(&program), Ok(Value::Int(42))));
    }

    #[test]
    fn compound_assign_on_unbound_name_is_name_error() {
        let mut interp = Interpreter::new();
        let program = Program { stmts: vec![Stmt::Assign(Assign {
            target: "x".into(), op: AssignOp::Add, value: int(1), span: sp(),
        })] };
        assert_eq!(interp.evaluate(&program).unwrap_err().kind, RuntimeErrorKind::NameError);
    }

    #[test]
    fn index_bounds() {
        let xs = Value::array(vec![Value::Int(1)]);
        assert!(matches!(index_value(&xs, &Value::Int(0), 1), Ok(Value::Int(1))));
        assert_eq!(index_value(&xs, &Value::Int(1), 1).unwrap_err().kind, RuntimeErrorKind::ValueError);
        assert_eq!(index_value(&xs, &Value::Int(-1), 1).unwrap_err().kind, RuntimeErrorKind::ValueError);
        assert_eq!(index_value(&xs, &Value::Float(0.0), 1).unwrap_err().kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn depth_limit_is_configurable() {
        let interp = Interpreter::new().with_config(InterpreterConfig { max_call_depth: 3 });
        assert_eq!(interp.config.max_call_depth, 3);
    }
}
