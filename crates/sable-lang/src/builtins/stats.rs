//! Descriptive statistics and simple linear regression over numeric sequences.
//! Variance and standard deviation use the population formulas.

use crate::error::RuntimeError;
use crate::runtime::value::Value;

/// Numeric view of a sequence; any non-number is a type error.
pub fn numbers(items: &[Value], op: &str, line: usize) -> Result<Vec<f64>, RuntimeError> {
    items.iter()
        .map(|v| v.as_f64().ok_or_else(|| RuntimeError::type_error(line, format!(
            "`{op}` expects numeric elements, got {}", v.type_name()
        ))))
        .collect()
}

fn non_empty(xs: &[f64], op: &str, line: usize) -> Result<(), RuntimeError> {
    if xs.is_empty() {
        Err(RuntimeError::value(line, format!("`{op}` of an empty sequence")))
    } else {
        Ok(())
    }
}

fn mean_of(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

pub fn mean(items: &[Value], line: usize) -> Result<f64, RuntimeError> {
    let xs = numbers(items, "mean", line)?;
    non_empty(&xs, "mean", line)?;
    Ok(mean_of(&xs))
}

/// Middle element for odd lengths (kept as-is), mean of the middle two as a
/// float for even lengths.
pub fn median(items: &[Value], line: usize) -> Result<Value, RuntimeError> {
    numbers(items, "median", line)?;
    if items.is_empty() {
        return Err(RuntimeError::value(line, "`median` of an empty sequence"));
    }
    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort_by(|a, b| {
        let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
        x.total_cmp(&y)
    });
    let n = sorted.len();
    if n % 2 == 1 {
        Ok(sorted[n / 2].clone())
    } else {
        let lo = sorted[n / 2 - 1].as_f64().unwrap_or(f64::NAN);
        let hi = sorted[n / 2].as_f64().unwrap_or(f64::NAN);
        Ok(Value::Float((lo + hi) / 2.0))
    }
}

pub fn variance(items: &[Value], line: usize) -> Result<f64, RuntimeError> {
    let xs = numbers(items, "variance", line)?;
    non_empty(&xs, "variance", line)?;
    let m = mean_of(&xs);
    Ok(xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64)
}

pub fn stddev(items: &[Value], line: usize) -> Result<f64, RuntimeError> {
    let xs = numbers(items, "stddev", line)?;
    non_empty(&xs, "stddev", line)?;
    variance(items, line).map(f64::sqrt)
}

/// Sum of a numeric sequence: an int when every element is an int.
pub fn sum(items: &[Value], line: usize) -> Result<Value, RuntimeError> {
    if items.iter().all(|v| matches!(v, Value::Int(_))) {
        let mut total: i64 = 0;
        for v in items {
            if let Value::Int(n) = v {
                total = total.checked_add(*n)
                    .ok_or_else(|| RuntimeError::value(line, "integer overflow in `sum`"))?;
            }
        }
        return Ok(Value::Int(total));
    }
    Ok(Value::Float(numbers(items, "sum", line)?.iter().sum()))
}

/// Smallest (or largest, with `largest`) element, returned unchanged.
pub fn extreme(items: &[Value], largest: bool, line: usize) -> Result<Value, RuntimeError> {
    let op = if largest { "max" } else { "min" };
    let xs = numbers(items, op, line)?;
    non_empty(&xs, op, line)?;
    let mut best = 0;
    for (i, x) in xs.iter().enumerate().skip(1) {
        let better = if largest { *x > xs[best] } else { *x < xs[best] };
        if better { best = i; }
    }
    Ok(items[best].clone())
}

// ─── Linear regression ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Regression {
    /// `[slope, intercept, r_squared]` as a list.
    pub fn to_value(self) -> Value {
        Value::list(vec![
            Value::Float(self.slope),
            Value::Float(self.intercept),
            Value::Float(self.r_squared),
        ])
    }
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
pub fn linreg(x: &[Value], y: &[Value], line: usize) -> Result<Regression, RuntimeError> {
    let xs = numbers(x, "linreg", line)?;
    let ys = numbers(y, "linreg", line)?;
    if xs.len() != ys.len() {
        return Err(RuntimeError::value(line, format!(
            "`linreg` expects sequences of equal length, got {} and {}", xs.len(), ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(RuntimeError::value(line, "`linreg` needs at least two points"));
    }

    let mx = mean_of(&xs);
    let my = mean_of(&ys);
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    if sxx == 0.0 {
        return Err(RuntimeError::value(line, "`linreg` needs at least two distinct x values"));
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let ss_tot: f64 = ys.iter().map(|y| (y - my).powi(2)).sum();
    let ss_res: f64 = xs.iter().zip(&ys)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    // a constant y is fit exactly by a horizontal line
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Ok(Regression { slope, intercept, r_squared })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;

    fn ints(xs: &[i64]) -> Vec<Value> { xs.iter().map(|&x| Value::Int(x)).collect() }
    fn floats(xs: &[f64]) -> Vec<Value> { xs.iter().map(|&x| Value::Float(x)).collect() }

    #[test]
    fn mean_of_ints() {
        assert_eq!(mean(&ints(&[1, 2, 3, 4, 5]), 1).unwrap(), 3.0);
    }

    #[test]
    fn median_odd_keeps_element() {
        assert!(matches!(median(&ints(&[5, 1, 3, 2, 4]), 1).unwrap(), Value::Int(3)));
    }

    #[test]
    fn median_even_averages() {
        assert!(matches!(median(&ints(&[4, 1, 3, 2]), 1).unwrap(), Value::Float(x) if x == 2.5));
    }

    #[test]
    fn population_variance_and_stddev() {
        let xs = ints(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(variance(&xs, 1).unwrap(), 4.0);
        assert_eq!(stddev(&xs, 1).unwrap(), 2.0);
    }

    #[test]
    fn empty_statistic_is_value_error() {
        assert_eq!(mean(&[], 1).unwrap_err().kind, RuntimeErrorKind::ValueError);
        assert_eq!(median(&[], 1).unwrap_err().kind, RuntimeErrorKind::ValueError);
        assert_eq!(stddev(&[], 1).unwrap_err().kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn non_numeric_is_type_error() {
        let xs = vec![Value::Int(1), Value::Str("x".into())];
        assert_eq!(mean(&xs, 1).unwrap_err().kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn sum_stays_int_for_ints() {
        assert!(matches!(sum(&ints(&[1, 2, 3]), 1).unwrap(), Value::Int(6)));
        assert!(matches!(sum(&floats(&[0.5, 0.25]), 1).unwrap(), Value::Float(x) if x == 0.75));
    }

    #[test]
    fn min_max_return_elements() {
        let xs = vec![Value::Int(3), Value::Float(-1.5), Value::Int(7)];
        assert!(matches!(extreme(&xs, false, 1).unwrap(), Value::Float(x) if x == -1.5));
        assert!(matches!(extreme(&xs, true, 1).unwrap(), Value::Int(7)));
    }

    #[test]
    fn linreg_known_fit() {
        let r = linreg(
            &floats(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            &floats(&[2.1, 4.0, 6.3, 8.0, 9.9]),
            1,
        ).unwrap();
        assert!((r.slope - 1.96).abs() < 0.01);
        assert!((r.intercept - 0.18).abs() < 0.01);
        assert!((r.r_squared - 0.998).abs() < 0.01);
    }

    #[test]
    fn linreg_length_mismatch() {
        let err = linreg(&ints(&[1, 2, 3]), &ints(&[1, 2]), 1).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn linreg_constant_x() {
        let err = linreg(&ints(&[2, 2, 2]), &ints(&[1, 2, 3]), 1).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
    }
}
