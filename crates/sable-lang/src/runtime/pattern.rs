//! `match` case patterns.

use crate::runtime::value::Value;
use crate::syntax::ast::{Literal, Pattern};

/// Try `pattern` against `value`, pushing identifier bindings onto `binds`.
///
/// Literal patterns need the same runtime variant as well as the same value:
/// `case 1` does not accept `1.0`. On a failed match `binds` may hold
/// partial bindings and should be discarded.
pub fn matches(pattern: &Pattern, value: &Value, binds: &mut Vec<(String, Value)>) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Bind(name) => {
            binds.push((name.clone(), value.clone()));
            true
        }
        Pattern::Literal(lit) => literal_matches(lit, value),
        Pattern::Array(items) => {
            let Some(seq) = value.as_seq() else { return false };
            let elems = seq.borrow();
            elems.len() == items.len()
                && items.iter().zip(elems.iter()).all(|(p, v)| matches(p, v, binds))
        }
    }
}

fn literal_matches(lit: &Literal, value: &Value) -> bool {
    match (lit, value) {
        (Literal::Int(a),   Value::Int(b))   => a == b,
        (Literal::Float(a), Value::Float(b)) => a == b,
        (Literal::Bool(a),  Value::Bool(b))  => a == b,
        (Literal::Str(a),   Value::Str(b))   => a == b,
        _ => false,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
