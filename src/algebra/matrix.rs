use std::fmt;

use nalgebra::DMatrix;

use crate::algebra::size_mismatch;
use crate::algebra::Vector;

const DEFAULT_NAME: &str = "M";

/// Struct, representing a named dense matrix of f64 values.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub(crate) name: String,
    pub(crate) data: DMatrix<f64>,
}

impl Matrix {
    /// Creates a zero matrix with the default name.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        return Matrix::named(DEFAULT_NAME, rows, cols);
    }

    /// Creates a named zero matrix.
    pub fn named(name: &str, rows: usize, cols: usize) -> Matrix {
        assert!(
            rows >= 1 && cols >= 1,
            "matrix dimensions must be positive: rows={}, cols={}",
            rows,
            cols
        );
        return Matrix {
            name: name.to_string(),
            data: DMatrix::zeros(rows, cols),
        };
    }

    /// Creates an identity matrix named after its size, e.g. "I3".
    pub fn identity(size: usize) -> Matrix {
        return Matrix::named_identity(&format!("I{}", size), size);
    }

    /// Creates a named identity matrix.
    pub fn named_identity(name: &str, size: usize) -> Matrix {
        assert!(
            size >= 1,
            "matrix dimensions must be positive: rows={}, cols={}",
            size,
            size
        );
        return Matrix {
            name: name.to_string(),
            data: DMatrix::identity(size, size),
        };
    }

    /// Creates a named matrix with entries drawn uniformly from [0, 1).
    pub fn random(name: &str, rows: usize, cols: usize) -> Matrix {
        assert!(
            rows >= 1 && cols >= 1,
            "matrix dimensions must be positive: rows={}, cols={}",
            rows,
            cols
        );
        return Matrix {
            name: name.to_string(),
            data: DMatrix::new_random(rows, cols),
        };
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    pub fn num_rows(&self) -> usize {
        return self.data.nrows();
    }

    pub fn num_cols(&self) -> usize {
        return self.data.ncols();
    }

    /// Dimensions of the matrix as text, for diagnostics.
    pub fn dimension_string(&self) -> String {
        return format!("{}x{}", self.num_rows(), self.num_cols());
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        return self.data[(row, col)];
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] = value;
    }

    pub fn transpose(&self) -> Matrix {
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: self.data.transpose(),
        };
    }

    pub fn add(&self, m: &Matrix) -> Matrix {
        if self.num_rows() != m.num_rows() || self.num_cols() != m.num_cols() {
            size_mismatch(&self.name, &self.dimension_string(), &m.name, &m.dimension_string());
        }
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: &self.data + &m.data,
        };
    }

    pub fn subtract(&self, m: &Matrix) -> Matrix {
        if self.num_rows() != m.num_rows() || self.num_cols() != m.num_cols() {
            size_mismatch(&self.name, &self.dimension_string(), &m.name, &m.dimension_string());
        }
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: &self.data - &m.data,
        };
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: self.data.scale(factor),
        };
    }

    pub fn multiply(&self, m: &Matrix) -> Matrix {
        if self.num_cols() != m.num_rows() {
            size_mismatch(&self.name, &self.dimension_string(), &m.name, &m.dimension_string());
        }
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: &self.data * &m.data,
        };
    }

    pub fn multiply_vector(&self, v: &Vector) -> Vector {
        if self.num_cols() != v.size() {
            size_mismatch(&self.name, &self.dimension_string(), &v.name, &v.dimension_string());
        }
        return Vector {
            name: v.name.clone(),
            data: &self.data * &v.data,
        };
    }

    /// Copies a rectangular block into a new matrix.
    pub fn sub_matrix(&self, offset_row: usize, offset_col: usize, rows: usize, cols: usize) -> Matrix {
        assert!(
            rows >= 1
                && cols >= 1
                && offset_row + rows <= self.num_rows()
                && offset_col + cols <= self.num_cols(),
            "invalid submatrix {}x{} at ({}, {}) of {}[{}]",
            rows,
            cols,
            offset_row,
            offset_col,
            self.name,
            self.dimension_string()
        );
        return Matrix {
            name: DEFAULT_NAME.to_string(),
            data: self.data.slice((offset_row, offset_col), (rows, cols)).into_owned(),
        };
    }

    pub fn row(&self, index: usize) -> Vector {
        assert!(
            index < self.num_rows(),
            "invalid row index {} for {}[{}]",
            index,
            self.name,
            self.dimension_string()
        );
        let mut v = Vector::new(self.num_cols());
        for j in 0..self.num_cols() {
            v.set(j, self.data[(index, j)]);
        }
        return v;
    }

    pub fn col(&self, index: usize) -> Vector {
        assert!(
            index < self.num_cols(),
            "invalid column index {} for {}[{}]",
            index,
            self.name,
            self.dimension_string()
        );
        let mut v = Vector::new(self.num_rows());
        for i in 0..self.num_rows() {
            v.set(i, self.data[(i, index)]);
        }
        return v;
    }

    pub fn set_row(&mut self, index: usize, v: &Vector) {
        assert!(
            index < self.num_rows(),
            "invalid row index {} for {}[{}]",
            index,
            self.name,
            self.dimension_string()
        );
        if v.size() != self.num_cols() {
            size_mismatch(&v.name, &v.dimension_string(), &self.name, &self.dimension_string());
        }
        for j in 0..self.num_cols() {
            self.data[(index, j)] = v.get(j);
        }
    }

    pub fn set_col(&mut self, index: usize, v: &Vector) {
        assert!(
            index < self.num_cols(),
            "invalid column index {} for {}[{}]",
            index,
            self.name,
            self.dimension_string()
        );
        if v.size() != self.num_rows() {
            size_mismatch(&v.name, &v.dimension_string(), &self.name, &self.dimension_string());
        }
        for i in 0..self.num_rows() {
            self.data[(i, index)] = v.get(i);
        }
    }

    /// Inverts a square matrix, or returns None when it is singular.
    pub fn try_inverse(&self) -> Option<Matrix> {
        assert!(
            self.data.is_square(),
            "cannot invert non-square matrix {}[{}]",
            self.name,
            self.dimension_string()
        );
        return self.data.clone().try_inverse().map(|data| Matrix {
            name: format!("{}^-1", self.name),
            data,
        });
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(self.name.len() + 4);
        write!(f, "{} = [", self.name)?;
        for i in 0..self.num_rows() {
            if i > 0 {
                write!(f, "{}", pad)?;
            }
            for j in 0..self.num_cols() {
                write!(f, "{} ", self.data[(i, j)])?;
            }
            if i + 1 < self.num_rows() {
                writeln!(f, ";")?;
            } else {
                write!(f, "]")?;
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn identity_has_ones_on_the_diagonal() {
        let m = Matrix::identity(3);
        assert_eq!(m.name(), "I3");
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    #[should_panic(expected = "matrix dimensions must be positive")]
    fn zero_dimensions_are_rejected() {
        Matrix::new(0, 3);
    }

    #[test]
    fn multiply_by_identity_is_a_no_op() {
        let mut m = Matrix::named("A", 2, 2);
        m.set(0, 0, 1.0);
        m.set(0, 1, 2.0);
        m.set(1, 0, 3.0);
        m.set(1, 1, 4.0);
        let p = m.multiply(&Matrix::identity(2));
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(p.get(i, j), m.get(i, j));
            }
        }
    }

    #[test]
    fn multiply_combines_rows_and_columns() {
        let mut a = Matrix::named("A", 2, 3);
        a.set_row(0, &Vector::from_values(&[1.0, 2.0, 3.0]));
        a.set_row(1, &Vector::from_values(&[4.0, 5.0, 6.0]));
        let mut b = Matrix::named("B", 3, 2);
        b.set_col(0, &Vector::from_values(&[7.0, 9.0, 11.0]));
        b.set_col(1, &Vector::from_values(&[8.0, 10.0, 12.0]));
        let p = a.multiply(&b);
        assert_close(p.get(0, 0), 58.0);
        assert_close(p.get(0, 1), 64.0);
        assert_close(p.get(1, 0), 139.0);
        assert_close(p.get(1, 1), 154.0);
    }

    #[test]
    #[should_panic(expected = "size mismatch: A[2x3] != B[2x2]")]
    fn multiply_reports_both_operands() {
        let a = Matrix::named("A", 2, 3);
        let b = Matrix::named("B", 2, 2);
        a.multiply(&b);
    }

    #[test]
    fn multiply_vector_applies_the_rows() {
        let mut m = Matrix::named("A", 2, 3);
        m.set_row(0, &Vector::from_values(&[1.0, 0.0, 2.0]));
        m.set_row(1, &Vector::from_values(&[0.0, 1.0, -1.0]));
        let v = Vector::from_values(&[3.0, 4.0, 5.0]);
        let p = m.multiply_vector(&v);
        assert_eq!(p.size(), 2);
        assert_close(p.get(0), 13.0);
        assert_close(p.get(1), -1.0);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let mut m = Matrix::named("A", 2, 3);
        m.set(0, 2, 5.0);
        m.set(1, 0, 7.0);
        let t = m.transpose();
        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_cols(), 2);
        assert_eq!(t.get(2, 0), 5.0);
        assert_eq!(t.get(0, 1), 7.0);
        // Transposing twice restores the original layout.
        let back = t.transpose();
        assert_eq!(back.get(0, 2), 5.0);
        assert_eq!(back.get(1, 0), 7.0);
    }

    #[test]
    fn add_and_subtract_elementwise() {
        let mut a = Matrix::named("A", 2, 2);
        a.set(0, 0, 1.0);
        a.set(1, 1, 2.0);
        let mut b = Matrix::named("B", 2, 2);
        b.set(0, 0, 3.0);
        b.set(1, 1, -1.0);
        let sum = a.add(&b);
        assert_eq!(sum.get(0, 0), 4.0);
        assert_eq!(sum.get(1, 1), 1.0);
        let diff = a.subtract(&b);
        assert_eq!(diff.get(0, 0), -2.0);
        assert_eq!(diff.get(1, 1), 3.0);
    }

    #[test]
    fn sub_matrix_copies_a_block() {
        let mut m = Matrix::named("A", 3, 4);
        m.set(1, 1, 5.0);
        m.set(2, 3, 7.0);
        let s = m.sub_matrix(1, 1, 2, 3);
        assert_eq!(s.num_rows(), 2);
        assert_eq!(s.num_cols(), 3);
        assert_eq!(s.get(0, 0), 5.0);
        assert_eq!(s.get(1, 2), 7.0);
    }

    #[test]
    #[should_panic(expected = "invalid submatrix")]
    fn sub_matrix_out_of_bounds_is_rejected() {
        Matrix::new(3, 3).sub_matrix(2, 2, 2, 2);
    }

    #[test]
    fn scale_multiplies_every_entry() {
        let m = Matrix::identity(2).scale(3.0);
        assert_eq!(m.get(0, 0), 3.0);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn inverse_of_a_simple_matrix() {
        let mut m = Matrix::named("A", 2, 2);
        m.set(0, 0, 4.0);
        m.set(1, 1, 2.0);
        let inv = m.try_inverse().unwrap();
        assert_close(inv.get(0, 0), 0.25);
        assert_close(inv.get(1, 1), 0.5);
        assert_close(inv.get(0, 1), 0.0);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Matrix::named("A", 3, 3);
        assert!(m.try_inverse().is_none());
    }

    #[test]
    #[should_panic(expected = "cannot invert non-square matrix")]
    fn inverse_needs_a_square_matrix() {
        Matrix::new(2, 3).try_inverse();
    }

    #[test]
    fn rows_and_columns_round_trip() {
        let mut m = Matrix::named("A", 2, 3);
        m.set_row(1, &Vector::from_values(&[1.0, 2.0, 3.0]));
        let r = m.row(1);
        assert_eq!(r.values(), &[1.0, 2.0, 3.0]);
        let c = m.col(2);
        assert_eq!(c.values(), &[0.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "invalid row index")]
    fn row_index_is_validated() {
        Matrix::new(2, 2).row(2);
    }
}
