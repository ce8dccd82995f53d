//! Lexical scope chain.
//!
//! Each frame is reference-counted so that closures can keep their
//! defining scope alive after the block that created it has exited.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::runtime::value::Value;
use crate::syntax::ast::Type;

/// A variable binding: its current value and the type it was declared
/// with, if any. Typed bindings are checked on every later assignment.
#[derive(Clone, Debug)]
pub struct Binding {
    pub value: Value,
    pub ty: Option<Type>,
}

struct Frame {
    vars: FxHashMap<String, Binding>,
    parent: Option<Environment>,
}

/// Handle to one frame of the scope chain. Cloning the handle shares the frame.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    /// A frame with no parent.
    pub fn root() -> Self {
        Self(Rc::new(RefCell::new(Frame { vars: FxHashMap::default(), parent: None })))
    }

    /// A fresh frame whose parent is `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            vars: FxHashMap::default(),
            parent: Some(self.clone()),
        })))
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.define_typed(name, value, None);
    }

    pub fn define_typed(&self, name: impl Into<String>, value: Value, ty: Option<Type>) {
        self.0.borrow_mut().vars.insert(name.into(), Binding { value, ty });
    }

    /// Nearest binding of `name`, walking outward.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut current = self.clone();
        loop {
            let next = {
                let frame = current.0.borrow();
                if let Some(b) = frame.vars.get(name) {
                    return Some(b.clone());
                }
                frame.parent.clone()?
            };
            current = next;
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).map(|b| b.value)
    }

    /// Declared type of the nearest binding of `name`.
    pub fn declared_type(&self, name: &str) -> Option<Type> {
        self.lookup(name).and_then(|b| b.ty)
    }

    /// Value bound in this frame only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().vars.get(name).map(|b| b.value.clone())
    }

    /// Rewrite the nearest existing binding of `name`, keeping its declared
    /// type. With no existing binding, `name` is defined in this frame.
    /// Returns `true` when an existing binding was rewritten.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            let next = {
                let mut frame = current.0.borrow_mut();
                if let Some(b) = frame.vars.get_mut(name) {
                    b.value = value;
                    return true;
                }
                frame.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => break,
            }
        }
        self.define(name, value);
        false
    }

    /// Number of frames from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut n = 1;
        let mut current = self.0.borrow().parent.clone();
        while let Some(env) = current {
            n += 1;
            current = env.0.borrow().parent.clone();
        }
        n
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<&String> = frame.vars.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
