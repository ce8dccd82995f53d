//! Native functions bound into the prelude, plus the numeric and sequence
//! libraries shared with the `xs.op(…)` operations.

use std::fmt;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::sink::{NoteSink, TextSink};

pub mod collections;
pub mod core;
pub mod matrix;
pub mod stats;

// ─── Host interface ──────────────────────────────────────────────────────────

/// What a native function may ask of the running interpreter.
pub trait Host {
    /// Call a user function or builtin with already-evaluated arguments.
    fn call_value(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError>;
    fn text_sink(&mut self) -> &mut dyn TextSink;
    fn note_sink(&mut self) -> &mut dyn NoteSink;
}

// ─── Builtin table ───────────────────────────────────────────────────────────

pub type NativeFn = fn(&mut dyn Host, &[Value], usize) -> Result<Value, RuntimeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub call: NativeFn,
}

impl Builtin {
    pub fn check_arity(&self, argc: usize, line: usize) -> Result<(), RuntimeError> {
        let ok = match self.arity {
            Arity::Exact(n)   => argc == n,
            Arity::AtLeast(n) => argc >= n,
        };
        if ok {
            return Ok(());
        }
        let expected = match self.arity {
            Arity::Exact(n)   => format!("{n}"),
            Arity::AtLeast(n) => format!("at least {n}"),
        };
        Err(RuntimeError::arity(line, format!(
            "`{}` expects {expected} args, got {argc}", self.name
        )))
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Every native function, in prelude order. Read-only and shared by all
/// interpreters.
pub fn all() -> &'static [Builtin] {
    core::BUILTINS
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Snapshot of an array or list argument.
pub(crate) fn seq_arg(v: &Value, name: &str, line: usize) -> Result<Vec<Value>, RuntimeError> {
    match v.as_seq() {
        Some(items) => Ok(items.borrow().clone()),
        None => Err(RuntimeError::type_error(line, format!(
            "`{name}` expects an array or list, got {}", v.type_name()
        ))),
    }
}

pub(crate) fn as_number(v: &Value, name: &str, line: usize) -> Result<f64, RuntimeError> {
    v.as_f64().ok_or_else(|| RuntimeError::type_error(line, format!(
        "`{name}` expects a number, got {}", v.type_name()
    )))
}
