//! Binary / unary operators and value comparison.
//!
//! `and` / `or` are not here: they short-circuit and live in the interpreter.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::builtins::matrix::Matrix;
use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::syntax::ast::{BinOp, UnOp};

pub fn binary(op: BinOp, l: &Value, r: &Value, line: usize) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Eq    => Ok(Value::Bool(values_equal(l, r))),
        BinOp::NotEq => Ok(Value::Bool(!values_equal(l, r))),
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => compare(op, l, r, line),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arithmetic(op, l, r, line),
        BinOp::And | BinOp::Or => match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinOp::And { *a && *b } else { *a || *b })),
            _ => Err(unsupported(op, l, r, line)),
        },
    }
}

fn unsupported(op: BinOp, l: &Value, r: &Value, line: usize) -> RuntimeError {
    RuntimeError::type_error(line, format!(
        "unsupported operand types for `{}`: {} and {}", op.symbol(), l.type_name(), r.type_name()
    ))
}

fn arithmetic(op: BinOp, l: &Value, r: &Value, line: usize) -> Result<Value, RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b, line),
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => Ok(Value::Str(format!("{a}{b}"))),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Mod => a % b,
                _ => return Err(unsupported(op, l, r, line)),
            })),
            _ => Err(unsupported(op, l, r, line)),
        },
    }
}

fn int_arithmetic(op: BinOp, a: i64, b: i64, line: usize) -> Result<Value, RuntimeError> {
    if b == 0 && matches!(op, BinOp::Div | BinOp::Mod) {
        return Err(RuntimeError::value(line, "integer division by zero"));
    }
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
        _ => None,
    };
    result
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::value(line, format!("integer overflow in `{a} {} {b}`", op.symbol())))
}

fn compare(op: BinOp, l: &Value, r: &Value, line: usize) -> Result<Value, RuntimeError> {
    let ord = match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (l.as_f64(), r.as_f64()) {
            // NaN compares false against everything
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(unsupported(op, l, r, line)),
        },
    };
    let result = match ord {
        None => false,
        Some(ord) => match op {
            BinOp::Lt   => ord == Ordering::Less,
            BinOp::LtEq => ord != Ordering::Greater,
            BinOp::Gt   => ord == Ordering::Greater,
            BinOp::GtEq => ord != Ordering::Less,
            _ => return Err(unsupported(op, l, r, line)),
        },
    };
    Ok(Value::Bool(result))
}

pub fn unary(op: UnOp, v: &Value, line: usize) -> Result<Value, RuntimeError> {
    match (op, v) {
        (UnOp::Neg, Value::Int(n)) => n.checked_neg()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::value(line, "integer overflow in negation")),
        (UnOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnOp::Not, Value::Bool(b))  => Ok(Value::Bool(!b)),
        (UnOp::Neg, other) => Err(RuntimeError::type_error(line, format!(
            "unary `-` not supported on {}", other.type_name()
        ))),
        (UnOp::Not, other) => Err(RuntimeError::type_error(line, format!(
            "`not` requires bool, got {}", other.type_name()
        ))),
    }
}

// ─── Equality / ordering ─────────────────────────────────────────────────────

/// Structural equality over any pair of values. Numbers compare after
/// promotion, sequences element-wise, functions by identity.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x),  Value::Int(y))  => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x),  Value::Str(y))  => x == y,
        (Value::Unit,    Value::Unit)    => true,
        (Value::Function(f), Value::Function(g)) => Rc::ptr_eq(f, g),
        (Value::Builtin(f),  Value::Builtin(g))  => f.name == g.name,
        (Value::Matrix(m), Value::Matrix(n)) => m == n,
        (Value::Matrix(m), other) | (other, Value::Matrix(m)) if other.as_seq().is_some() => {
            Matrix::from_value(other, 0).is_ok_and(|o| **m == o)
        }
        _ if a.is_numeric() && b.is_numeric() => a.as_f64() == b.as_f64(),
        _ => match (a.as_seq(), b.as_seq()) {
            (Some(xs), Some(ys)) => {
                if Rc::ptr_eq(xs, ys) { return true; }
                let (xs, ys) = (xs.borrow(), ys.borrow());
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y))
            }
            _ => false,
        },
    }
}

/// Ordering used by `sort`: numbers numerically, strings lexicographically,
/// bools `false < true`. Any other pairing is a type error.
pub fn sort_order(a: &Value, b: &Value, line: usize) -> Result<Ordering, RuntimeError> {
    match (a, b) {
        (Value::Int(x),  Value::Int(y))  => Ok(x.cmp(y)),
        (Value::Str(x),  Value::Str(y))  => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(x.total_cmp(&y)),
            _ => Err(RuntimeError::type_error(line, format!(
                "cannot order {} and {}", a.type_name(), b.type_name()
            ))),
        },
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;

    fn bin(op: BinOp, l: Value, r: Value) -> Result<Value, RuntimeError> {
        binary(op, &l, &r, 1)
    }

    #[test]
    fn int_arithmetic_stays_int() {
        assert!(matches!(bin(BinOp::Add, Value::Int(2), Value::Int(3)), Ok(Value::Int(5))));
        assert!(matches!(bin(BinOp::Div, Value::Int(7), Value::Int(2)), Ok(Value::Int(3))));
        assert!(matches!(bin(BinOp::Div, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-3))));
        assert!(matches!(bin(BinOp::Mod, Value::Int(7), Value::Int(3)), Ok(Value::Int(1))));
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        assert!(matches!(bin(BinOp::Mul, Value::Int(10), Value::Float(3.14)), Ok(Value::Float(x)) if (x - 31.4).abs() < 1e-9));
    }

    #[test]
    fn int_division_by_zero_is_value_error() {
        let err = bin(BinOp::Div, Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
        let err = bin(BinOp::Mod, Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        assert!(matches!(bin(BinOp::Div, Value::Float(1.0), Value::Int(0)), Ok(Value::Float(x)) if x.is_infinite()));
    }

    #[test]
    fn int_overflow_is_value_error() {
        let err = bin(BinOp::Add, Value::Int(i64::MAX), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn string_concat_and_compare() {
        assert!(matches!(bin(BinOp::Add, Value::Str("ab".into()), Value::Str("c".into())), Ok(Value::Str(s)) if s == "abc"));
        assert!(matches!(bin(BinOp::Lt, Value::Str("a".into()), Value::Str("b".into())), Ok(Value::Bool(true))));
    }

    #[test]
    fn mismatched_operands_name_both_types() {
        let err = bin(BinOp::Add, Value::Str("a".into()), Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::TypeError);
        assert!(err.message.contains("string") && err.message.contains("int") && err.message.contains('+'));
    }

    #[test]
    fn equality_across_numeric_kinds() {
        assert!(values_equal(&Value::Int(1), &Value::Float(1.0)));
        assert!(!values_equal(&Value::Int(1), &Value::Str("1".into())));
    }

    #[test]
    fn sequence_equality_is_elementwise() {
        let a = Value::array(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(vec![Value::Int(1), Value::Float(2.0)]);
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &Value::array(vec![Value::Int(1)])));
    }

    #[test]
    fn matrix_equals_nested_array() {
        let m = Value::Matrix(Rc::new(Matrix::new(1, 2, vec![6.0, 8.0])));
        let a = Value::array(vec![Value::array(vec![Value::Int(6), Value::Int(8)])]);
        assert!(values_equal(&m, &a));
    }

    #[test]
    fn unary_ops() {
        assert!(matches!(unary(UnOp::Neg, &Value::Int(3), 1), Ok(Value::Int(-3))));
        assert!(matches!(unary(UnOp::Not, &Value::Bool(false), 1), Ok(Value::Bool(true))));
        assert_eq!(unary(UnOp::Not, &Value::Int(0), 1).unwrap_err().kind, RuntimeErrorKind::TypeError);
    }
}
