//! Explicit casts, declared-type checks and default values.

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::syntax::ast::Type;

/// Value of `let x: T;` with no initializer.
pub fn default_for(ty: &Type) -> Value {
    match ty {
        Type::Int      => Value::Int(0),
        Type::Float    => Value::Float(0.0),
        Type::Bool     => Value::Bool(false),
        Type::String   => Value::Str(String::new()),
        Type::Array(_) => Value::array(Vec::new()),
        Type::List(_)  => Value::list(Vec::new()),
        Type::Func     => Value::Unit,
    }
}

// ─── Casts ───────────────────────────────────────────────────────────────────

/// `Int(x)`, `Float(x)`, `Bool(x)`, `String(x)`.
pub fn cast(v: &Value, ty: &Type, line: usize) -> Result<Value, RuntimeError> {
    let invalid = || RuntimeError::type_error(line, format!("cannot cast {} `{v}` to {ty}", v.type_name()));

    match ty {
        Type::Int => match v {
            Value::Int(n)   => Ok(Value::Int(*n)),
            Value::Float(x) => float_to_int(*x).map(Value::Int).ok_or_else(invalid),
            Value::Bool(b)  => Ok(Value::Int(*b as i64)),
            Value::Str(s)   => match parse_bool_word(s) {
                Some(b) => Ok(Value::Int(b as i64)),
                None => {
                    let t = s.trim();
                    t.parse::<i64>().ok()
                        .or_else(|| t.parse::<f64>().ok().and_then(float_to_int))
                        .map(Value::Int)
                        .ok_or_else(invalid)
                }
            },
            _ => Err(invalid()),
        },

        Type::Float => match v {
            Value::Int(n)   => Ok(Value::Float(*n as f64)),
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Bool(b)  => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(s)   => match parse_bool_word(s) {
                Some(b) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
                None => s.trim().parse::<f64>().map(Value::Float).map_err(|_| invalid()),
            },
            _ => Err(invalid()),
        },

        Type::Bool => match v {
            Value::Bool(b)  => Ok(Value::Bool(*b)),
            Value::Int(n)   => Ok(Value::Bool(*n != 0)),
            Value::Float(x) => Ok(Value::Bool(*x != 0.0)),
            Value::Str(s)   => match parse_bool_word(s) {
                Some(b) => Ok(Value::Bool(b)),
                None => s.trim().parse::<f64>().map(|x| Value::Bool(x != 0.0)).map_err(|_| invalid()),
            },
            _ => Err(invalid()),
        },

        Type::String => match v {
            Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Str(_) => Ok(Value::Str(v.to_string())),
            _ => Err(invalid()),
        },

        Type::Array(_) | Type::List(_) | Type::Func => Err(invalid()),
    }
}

fn parse_bool_word(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true"  => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Truncation toward zero; non-finite or out-of-range floats have no int form.
fn float_to_int(x: f64) -> Option<i64> {
    let t = x.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

// ─── Declared-type checks ────────────────────────────────────────────────────

/// Check `v` against a declared type, widening ints to floats where a
/// float is expected. Returns the (possibly widened) value.
pub fn check_assignable(ty: &Type, v: Value, line: usize) -> Result<Value, RuntimeError> {
    match conform(ty, &v) {
        Some(Some(widened)) => Ok(widened),
        Some(None) => Ok(v),
        None => Err(RuntimeError::type_error(line, format!(
            "expected {ty}, got {} `{v}`", v.type_name()
        ))),
    }
}

/// `None` on mismatch; `Some(None)` when `v` fits as-is; `Some(Some(w))`
/// when it fits after widening to `w`. Sequences are only copied when an
/// element actually needs widening, so aliasing is otherwise preserved.
fn conform(ty: &Type, v: &Value) -> Option<Option<Value>> {
    match (ty, v) {
        (Type::Int, Value::Int(_))
        | (Type::Float, Value::Float(_))
        | (Type::Bool, Value::Bool(_))
        | (Type::String, Value::Str(_))
        | (Type::Func, Value::Function(_) | Value::Builtin(_) | Value::Unit) => Some(None),

        (Type::Float, Value::Int(n)) => Some(Some(Value::Float(*n as f64))),

        // a matrix result stands in for a 2-D numeric array
        (Type::Array(inner), Value::Matrix(_))
            if matches!(**inner, Type::Array(ref e) if matches!(**e, Type::Float)) => Some(None),

        (Type::Array(inner), Value::Array(items)) => {
            let mut widened: Option<Vec<Value>> = None;
            {
                let items = items.borrow();
                for (i, item) in items.iter().enumerate() {
                    match conform(inner, item)? {
                        None => {
                            if let Some(w) = widened.as_mut() { w.push(item.clone()); }
                        }
                        Some(new) => {
                            let w = widened.get_or_insert_with(|| items[..i].to_vec());
                            w.push(new);
                        }
                    }
                }
            }
            Some(widened.map(Value::array))
        }

        (Type::List(_), Value::List(_)) => Some(None),

        _ => None,
    }
}

/// Element-level check for `xs[i] = v` against a declared `array<T>`.
/// Lists and untyped bindings accept anything.
pub fn check_element(container_ty: Option<&Type>, v: Value, line: usize) -> Result<Value, RuntimeError> {
    match container_ty {
        Some(Type::Array(inner)) => check_assignable(inner, v, line),
        _ => Ok(v),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
