//! Sequence transforms shared by the `xs.op(…)` operations and the free
//! builtins of the same name.

use crate::builtins::Host;
use crate::error::RuntimeError;
use crate::runtime::ops::{sort_order, values_equal};
use crate::runtime::value::{Seq, Value};

/// Rotation / shift amounts must be ints.
pub fn int_arg(v: &Value, op: &str, line: usize) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::value(line, format!(
            "`{op}` expects an int amount, got {}", other.type_name()
        ))),
    }
}

/// Right rotation: the last `k` elements move to the front. Negative `k`
/// rotates left.
pub fn rotate(items: &[Value], k: i64) -> Vec<Value> {
    let n = items.len();
    if n == 0 { return Vec::new(); }
    let k = k.rem_euclid(n as i64) as usize;
    let split = n - k;
    items[split..].iter().chain(&items[..split]).cloned().collect()
}

/// Zero-filling shift. Positive `k` shifts right (zeros enter at the
/// front), negative shifts left (zeros enter at the end). The magnitude is
/// reduced modulo the length.
pub fn shift(items: &[Value], k: i64) -> Vec<Value> {
    let n = items.len();
    if n == 0 { return Vec::new(); }
    let zero = if items.iter().any(|v| matches!(v, Value::Float(_))) {
        Value::Float(0.0)
    } else {
        Value::Int(0)
    };
    let m = (k.unsigned_abs() % n as u64) as usize;
    let mut out = Vec::with_capacity(n);
    if k >= 0 {
        out.extend(std::iter::repeat_n(zero, m));
        out.extend_from_slice(&items[..n - m]);
    } else {
        out.extend_from_slice(&items[m..]);
        out.extend(std::iter::repeat_n(zero, m));
    }
    out
}

/// In-place stable sort; incomparable element kinds are a type error.
pub fn sort(items: &mut [Value], line: usize) -> Result<(), RuntimeError> {
    // validate first so the comparator below never sees a mixed pair
    if let Some(first) = items.first() {
        for v in items.iter().skip(1) {
            sort_order(first, v, line)?;
        }
    }
    items.sort_by(|a, b| sort_order(a, b, line).unwrap_or(std::cmp::Ordering::Equal));
    Ok(())
}

/// Remove the first element equal to `target`. The search runs under a
/// shared borrow since `target` may be (or contain) `items` itself.
pub fn remove(items: &Seq, target: &Value, line: usize) -> Result<(), RuntimeError> {
    let pos = items.borrow().iter().position(|v| values_equal(v, target));
    match pos {
        Some(i) => { items.borrow_mut().remove(i); Ok(()) }
        None => Err(RuntimeError::value(line, format!("`remove`: {target} not found"))),
    }
}

fn check_callable(f: &Value, op: &str, line: usize) -> Result<(), RuntimeError> {
    if f.is_callable() {
        Ok(())
    } else {
        Err(RuntimeError::type_error(line, format!(
            "`{op}` expects a function, got {}", f.type_name()
        )))
    }
}

/// Apply `f` to every element, preserving order and length.
pub fn map(host: &mut dyn Host, items: &[Value], f: &Value, line: usize) -> Result<Vec<Value>, RuntimeError> {
    check_callable(f, "map", line)?;
    items.iter()
        .map(|item| host.call_value(f, vec![item.clone()], line))
        .collect()
}

/// Keep the elements for which `f` yields `true`.
pub fn filter(host: &mut dyn Host, items: &[Value], f: &Value, line: usize) -> Result<Vec<Value>, RuntimeError> {
    check_callable(f, "filter", line)?;
    let mut kept = Vec::new();
    for item in items {
        match host.call_value(f, vec![item.clone()], line)? {
            Value::Bool(true)  => kept.push(item.clone()),
            Value::Bool(false) => {}
            other => return Err(RuntimeError::type_error(line, format!(
                "`filter` predicate must return bool, got {}", other.type_name()
            ))),
        }
    }
    Ok(kept)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
