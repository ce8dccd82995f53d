//! Dense matrix algebra.
//! Row-major storage: element at (row, col) = data[row * cols + col].

use std::fmt;

use crate::error::RuntimeError;
use crate::runtime::value::Value;

/// Pivots smaller than this are treated as zero during inversion.
const SINGULAR_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n { data[i * n + i] = 1.0; }
        Self::new(n, n, data)
    }

    /// Build from a matrix value or a rectangular sequence of numeric rows.
    pub fn from_value(v: &Value, line: usize) -> Result<Self, RuntimeError> {
        if let Value::Matrix(m) = v {
            return Ok((**m).clone());
        }
        let Some(rows) = v.as_seq() else {
            return Err(RuntimeError::type_error(line, format!(
                "expected a matrix or a 2-D numeric array, got {}", v.type_name()
            )));
        };
        let rows = rows.borrow();
        let mut data = Vec::new();
        let mut cols = None;
        for row in rows.iter() {
            let Some(row) = row.as_seq() else {
                return Err(RuntimeError::type_error(line, format!(
                    "matrix rows must be arrays, got {}", row.type_name()
                )));
            };
            let row = row.borrow();
            match cols {
                None => cols = Some(row.len()),
                Some(c) if c != row.len() => {
                    return Err(RuntimeError::type_error(line, format!(
                        "ragged matrix: expected rows of length {c}, got {}", row.len()
                    )));
                }
                Some(_) => {}
            }
            for x in row.iter() {
                data.push(x.as_f64().ok_or_else(|| RuntimeError::type_error(line, format!(
                    "matrix elements must be numeric, got {}", x.type_name()
                )))?);
            }
        }
        match cols {
            Some(c) if c > 0 => Ok(Self::new(rows.len(), c, data)),
            _ => Err(RuntimeError::type_error(line, "matrix must have at least one row and column")),
        }
    }

    pub fn rows(&self) -> usize { self.rows }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    fn shape(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn add(&self, other: &Matrix, line: usize) -> Result<Matrix, RuntimeError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(RuntimeError::value(line, format!(
                "matrix add: expected {}, got {}", self.shape(), other.shape()
            )));
        }
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        Ok(Matrix::new(self.rows, self.cols, data))
    }

    pub fn multiply(&self, other: &Matrix, line: usize) -> Result<Matrix, RuntimeError> {
        if self.cols != other.rows {
            return Err(RuntimeError::value(line, format!(
                "matrix multiply: expected {}x{}, got {}", self.cols, other.cols, other.shape()
            )));
        }
        let mut data = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                for k in 0..self.cols {
                    data[i * other.cols + j] += self.at(i, k) * other.at(k, j);
                }
            }
        }
        Ok(Matrix::new(self.rows, other.cols, data))
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.at(i, j));
            }
        }
        Matrix::new(self.cols, self.rows, data)
    }

    /// Gauss-Jordan elimination with partial pivoting.
    pub fn invert(&self, line: usize) -> Result<Matrix, RuntimeError> {
        if self.rows != self.cols {
            return Err(RuntimeError::value(line, format!(
                "matrix invert: expected {n}x{n}, got {}", self.shape(), n = self.rows
            )));
        }
        let n = self.rows;
        let mut a = self.data.clone();
        let mut inv = Matrix::identity(n).data;

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&r1, &r2| a[r1 * n + col].abs().total_cmp(&a[r2 * n + col].abs()))
                .unwrap_or(col);
            if a[pivot * n + col].abs() < SINGULAR_EPS {
                return Err(RuntimeError::value(line, "matrix invert: matrix is singular"));
            }
            if pivot != col {
                for k in 0..n {
                    a.swap(pivot * n + k, col * n + k);
                    inv.swap(pivot * n + k, col * n + k);
                }
            }

            let p = a[col * n + col];
            for k in 0..n {
                a[col * n + k] /= p;
                inv[col * n + k] /= p;
            }

            for r in 0..n {
                if r == col { continue; }
                let factor = a[r * n + col];
                if factor == 0.0 { continue; }
                for k in 0..n {
                    a[r * n + k] -= factor * a[col * n + k];
                    inv[r * n + k] -= factor * inv[col * n + k];
                }
            }
        }
        Ok(Matrix::new(n, n, inv))
    }

    /// Row `i` as an array of floats.
    pub fn row_value(&self, i: usize) -> Value {
        Value::array(self.row(i).iter().map(|&x| Value::Float(x)).collect())
    }

    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.data.iter().zip(&other.data).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "[")?;
            for (j, x) in self.row(i).iter().enumerate() {
                if j > 0 { write!(f, ", ")?; }
                write!(f, "{x:?}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeErrorKind;

    fn m(rows: &[&[f64]]) -> Matrix {
        let cols = rows[0].len();
        Matrix::new(rows.len(), cols, rows.iter().flat_map(|r| r.iter().copied()).collect())
    }

    fn nested(rows: &[&[i64]]) -> Value {
        Value::array(rows.iter()
            .map(|r| Value::array(r.iter().map(|&x| Value::Int(x)).collect()))
            .collect())
    }

    #[test]
    fn from_value_accepts_int_rows() {
        let mat = Matrix::from_value(&nested(&[&[1, 2], &[3, 4]]), 1).unwrap();
        assert_eq!(mat, m(&[&[1.0, 2.0], &[3.0, 4.0]]));
    }

    #[test]
    fn from_value_rejects_ragged() {
        let err = Matrix::from_value(&nested(&[&[1, 2], &[3]]), 1).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn from_value_rejects_non_numeric() {
        let v = Value::array(vec![Value::array(vec![Value::Str("a".into())])]);
        let err = Matrix::from_value(&v, 1).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::TypeError);
    }

    #[test]
    fn add_same_shape() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        assert_eq!(a.add(&b, 1).unwrap(), m(&[&[6.0, 8.0], &[10.0, 12.0]]));
    }

    #[test]
    fn add_shape_mismatch_names_shapes() {
        let a = m(&[&[1.0, 2.0]]);
        let b = m(&[&[1.0], &[2.0]]);
        let err = a.add(&b, 3).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
        assert!(err.message.contains("expected 1x2, got 2x1"), "{}", err.message);
    }

    #[test]
    fn multiply_rectangular() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let b = m(&[&[1.0], &[2.0], &[3.0]]);
        assert_eq!(a.multiply(&b, 1).unwrap(), m(&[&[14.0]]));
    }

    #[test]
    fn multiply_inner_mismatch() {
        let a = m(&[&[1.0, 2.0]]);
        let err = a.multiply(&a, 1).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn transpose_swaps_axes() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(a.transpose(), m(&[&[1.0, 4.0], &[2.0, 5.0], &[3.0, 6.0]]));
    }

    #[test]
    fn invert_round_trip() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let back = a.invert(1).unwrap().invert(1).unwrap();
        assert!(back.approx_eq(&a, 1e-9));
    }

    #[test]
    fn invert_times_original_is_identity() {
        let a = m(&[&[0.0, 2.0, 1.0], &[1.0, 0.0, 0.0], &[3.0, 1.0, 1.0]]);
        let prod = a.multiply(&a.invert(1).unwrap(), 1).unwrap();
        assert!(prod.approx_eq(&Matrix::identity(3), 1e-9));
    }

    #[test]
    fn invert_singular_is_value_error() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(a.invert(1).unwrap_err().kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn invert_non_square_is_value_error() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        assert_eq!(a.invert(1).unwrap_err().kind, RuntimeErrorKind::ValueError);
    }

    #[test]
    fn display_nested() {
        assert_eq!(m(&[&[1.0, 2.5]]).to_string(), "[[1.0, 2.5]]");
    }
}
