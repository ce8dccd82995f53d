//! Always-available natives: output, sizes, math, statistics and the
//! free-function forms of the sequence transforms.
//!
//! Free-function forms never create `<subject>_<op>` bindings.

use tracing::debug;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use super::{Arity, Builtin, Host, as_number, collections, seq_arg, stats};

pub static BUILTINS: &[Builtin] = &[
    Builtin { name: "print",    arity: Arity::AtLeast(0), call: print },
    Builtin { name: "play",     arity: Arity::Exact(1),   call: play },
    Builtin { name: "len",      arity: Arity::Exact(1),   call: len },
    Builtin { name: "mean",     arity: Arity::Exact(1),   call: mean },
    Builtin { name: "median",   arity: Arity::Exact(1),   call: median },
    Builtin { name: "variance", arity: Arity::Exact(1),   call: variance },
    Builtin { name: "stddev",   arity: Arity::Exact(1),   call: stddev },
    Builtin { name: "sum",      arity: Arity::Exact(1),   call: sum },
    Builtin { name: "min",      arity: Arity::Exact(1),   call: min },
    Builtin { name: "max",      arity: Arity::Exact(1),   call: max },
    Builtin { name: "abs",      arity: Arity::Exact(1),   call: abs },
    Builtin { name: "sqrt",     arity: Arity::Exact(1),   call: sqrt },
    Builtin { name: "linreg",   arity: Arity::Exact(2),   call: linreg },
    Builtin { name: "map",      arity: Arity::Exact(2),   call: map },
    Builtin { name: "filter",   arity: Arity::Exact(2),   call: filter },
    Builtin { name: "rotate",   arity: Arity::Exact(2),   call: rotate },
    Builtin { name: "shift",    arity: Arity::Exact(2),   call: shift },
];

// ─── Output ──────────────────────────────────────────────────────────────────

fn print(host: &mut dyn Host, args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    host.text_sink().print(args);
    Ok(Value::Unit)
}

fn play(host: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let notes = seq_arg(&args[0], "play", line)?;
    stats::numbers(&notes, "play", line)?;
    debug!(count = notes.len(), "handing sequence to note sink");
    host.note_sink().play(&notes);
    Ok(Value::Unit)
}

// ─── Sizes / math ────────────────────────────────────────────────────────────

fn len(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let n = match &args[0] {
        Value::Array(items) | Value::List(items) => items.borrow().len(),
        Value::Str(s)    => s.chars().count(),
        Value::Matrix(m) => m.rows(),
        other => return Err(RuntimeError::type_error(line, format!(
            "`len` expects a sequence or string, got {}", other.type_name()
        ))),
    };
    Ok(Value::Int(n as i64))
}

fn abs(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => n.checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::value(line, "integer overflow in `abs`")),
        other => Ok(Value::Float(as_number(other, "abs", line)?.abs())),
    }
}

fn sqrt(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    Ok(Value::Float(as_number(&args[0], "sqrt", line)?.sqrt()))
}

// ─── Statistics ──────────────────────────────────────────────────────────────

fn mean(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::mean(&seq_arg(&args[0], "mean", line)?, line).map(Value::Float)
}

fn median(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::median(&seq_arg(&args[0], "median", line)?, line)
}

fn variance(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::variance(&seq_arg(&args[0], "variance", line)?, line).map(Value::Float)
}

fn stddev(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::stddev(&seq_arg(&args[0], "stddev", line)?, line).map(Value::Float)
}

fn sum(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::sum(&seq_arg(&args[0], "sum", line)?, line)
}

fn min(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::extreme(&seq_arg(&args[0], "min", line)?, false, line)
}

fn max(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    stats::extreme(&seq_arg(&args[0], "max", line)?, true, line)
}

fn linreg(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let x = seq_arg(&args[0], "linreg", line)?;
    let y = seq_arg(&args[1], "linreg", line)?;
    Ok(stats::linreg(&x, &y, line)?.to_value())
}

// ─── Transforms ──────────────────────────────────────────────────────────────

fn map(host: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let items = seq_arg(&args[0], "map", line)?;
    Ok(args[0].same_kind(collections::map(host, &items, &args[1], line)?))
}

fn filter(host: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let items = seq_arg(&args[0], "filter", line)?;
    Ok(args[0].same_kind(collections::filter(host, &items, &args[1], line)?))
}

fn rotate(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let items = seq_arg(&args[0], "rotate", line)?;
    let k = collections::int_arg(&args[1], "rotate", line)?;
    Ok(args[0].same_kind(collections::rotate(&items, k)))
}

fn shift(_: &mut dyn Host, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let items = seq_arg(&args[0], "shift", line)?;
    let k = collections::int_arg(&args[1], "shift", line)?;
    Ok(args[0].same_kind(collections::shift(&items, k)))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;
    use crate::sink::{CaptureSink, NoteSink, TextSink};

    /// Host that can only call other builtins.
    struct NativeHost {
        sink: CaptureSink,
    }

    impl Host for NativeHost {
        fn call_value(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> Result<Value, RuntimeError> {
            match callee {
                Value::Builtin(b) => {
                    b.check_arity(args.len(), line)?;
                    (b.call)(self, &args, line)
                }
                other => panic!("unexpected callee {other:?}"),
            }
        }
        fn text_sink(&mut self) -> &mut dyn TextSink { &mut self.sink }
        fn note_sink(&mut self) -> &mut dyn NoteSink { &mut self.sink }
    }

    fn lookup(name: &str) -> Option<&'static Builtin> {
        BUILTINS.iter().find(|b| b.name == name)
    }

    fn call(name: &str, args: Vec<Value>) -> (Result<Value, RuntimeError>, CaptureSink) {
        let sink = CaptureSink::new();
        let mut host = NativeHost { sink: sink.clone() };
        let b = lookup(name).unwrap_or_else(|| panic!("no builtin {name}"));
        let result = b.check_arity(args.len(), 1).and_then(|_| (b.call)(&mut host, &args, 1));
        (result, sink)
    }

    fn ints(xs: &[i64]) -> Value { Value::array(xs.iter().map(|&x| Value::Int(x)).collect()) }

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<&str> = BUILTINS.iter().map(|b| b.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BUILTINS.len());
    }

    #[test]
    fn print_goes_to_text_sink() {
        let (r, sink) = call("print", vec![Value::Str("hi".into()), Value::Int(2)]);
        assert!(matches!(r, Ok(Value::Unit)));
        assert_eq!(sink.lines(), vec!["hi 2".to_string()]);
    }

    #[test]
    fn play_passes_sequence_unmodified() {
        let (r, sink) = call("play", vec![ints(&[60, 62, 64])]);
        assert!(r.is_ok());
        let seqs = sink.sequences();
        assert_eq!(seqs.len(), 1);
        assert!(matches!(seqs[0][2], Value::Int(64)));
    }

    #[test]
    fn play_rejects_non_numeric() {
        let (r, _) = call("play", vec![Value::list(vec![Value::Str("C".into())])]);
        assert_eq!(r.unwrap_err().kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn len_of_kinds() {
        assert!(matches!(call("len", vec![ints(&[1, 2])]).0, Ok(Value::Int(2))));
        assert!(matches!(call("len", vec![Value::Str("héllo".into())]).0, Ok(Value::Int(5))));
        assert_eq!(call("len", vec![Value::Int(3)]).0.unwrap_err().kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn wrong_arg_count_is_arity_error() {
        assert_eq!(call("len", vec![]).0.unwrap_err().kind, RuntimeErrorKind::ArityError);
        assert_eq!(call("rotate", vec![ints(&[1])]).0.unwrap_err().kind, RuntimeErrorKind::ArityError);
    }

    #[test]
    fn abs_and_sqrt() {
        assert!(matches!(call("abs", vec![Value::Int(-4)]).0, Ok(Value::Int(4))));
        assert!(matches!(call("sqrt", vec![Value::Int(16)]).0, Ok(Value::Float(x)) if x == 4.0));
        assert_eq!(call("abs", vec![Value::Int(i64::MIN)]).0.unwrap_err().kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn map_with_builtin_keeps_kind() {
        let xs = Value::list(vec![Value::Int(-1), Value::Int(2)]);
        let abs = Value::Builtin(lookup("abs").unwrap());
        match call("map", vec![xs, abs]).0.unwrap() {
            Value::List(items) => assert!(matches!(items.borrow()[0], Value::Int(1))),
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn linreg_returns_three_floats() {
        let x = ints(&[1, 2, 3]);
        let y = ints(&[2, 4, 6]);
        match call("linreg", vec![x, y]).0.unwrap() {
            Value::List(items) => {
                let items = items.borrow();
                assert_eq!(items.len(), 3);
                assert!(matches!(items[0], Value::Float(s) if (s - 2.0).abs() < 1e-12));
            }
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn rotate_non_int_is_value_error() {
        let (r, _) = call("rotate", vec![ints(&[1, 2]), Value::Str("1".into())]);
        assert_eq!(r.unwrap_err().kind, RuntimeErrorKind::ValueError);
    }
}
