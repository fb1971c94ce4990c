//! Simple sparse matrix and conjugate gradient solver.
//!
//! This module provides a lightweight sparse matrix implementation (CSR format)
//! and a conjugate gradient solver for symmetric positive definite systems.
//! It backs the cotan Laplacian, the discrete exterior calculus operators, the
//! heat method, and boundary first flattening.

use std::ops::Range;

use nalgebra::DVector;

use crate::error::{GeomError, Result};

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores a sparse matrix in CSR format for efficient matrix-vector multiplication.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each non-zero value.
    col_idx: Vec<usize>,
    /// Non-zero values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        if triplets.is_empty() {
            return Self {
                rows,
                cols,
                row_ptr: vec![0; rows + 1],
                col_idx: Vec::new(),
                values: Vec::new(),
            };
        }

        // Sort by (row, col) for CSR construction
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        // Merge duplicates and build CSR
        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values = Vec::with_capacity(triplets.len());

        let mut prev_row = usize::MAX;
        let mut prev_col = usize::MAX;

        for (row, col, val) in triplets {
            if row == prev_row && col == prev_col {
                // Same position: accumulate value
                *values.last_mut().unwrap() += val;
            } else {
                // New entry
                col_idx.push(col);
                values.push(val);
                // Update row pointers for any skipped rows
                for r in (prev_row.wrapping_add(1))..=row {
                    row_ptr[r] = col_idx.len() - 1;
                }
                prev_row = row;
                prev_col = col;
            }
        }

        // Fill remaining row pointers
        let nnz = col_idx.len();
        for r in (prev_row + 1)..=rows {
            row_ptr[r] = nnz;
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Create a square diagonal matrix from its diagonal entries.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let triplets: Vec<(usize, usize, f64)> = diag
            .iter()
            .enumerate()
            .map(|(i, &d)| (i, i, d))
            .collect();
        Self::from_triplets(diag.len(), diag.len(), triplets)
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the entry at (row, col), zero if not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        // Columns within a row are sorted
        match self.col_idx[start..end].binary_search(&col) {
            Ok(k) => self.values[start + k],
            Err(_) => 0.0,
        }
    }

    /// Get the diagonal as a dense vector.
    pub fn diagonal(&self) -> DVector<f64> {
        let n = self.rows.min(self.cols);
        DVector::from_fn(n, |i, _| self.get(i, i))
    }

    /// Export the stored entries as triplets.
    pub fn to_triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut triplets = Vec::with_capacity(self.nnz());
        for i in 0..self.rows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                triplets.push((i, self.col_idx[k], self.values[k]));
            }
        }
        triplets
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");

        let mut y = DVector::zeros(self.rows);

        for i in 0..self.rows {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];

            let mut sum = 0.0;
            for k in start..end {
                sum += self.values[k] * x[self.col_idx[k]];
            }
            y[i] = sum;
        }

        y
    }

    /// Multiply matrix by vector, adding to existing vector: y += A * x.
    pub fn mul_vec_add(&self, x: &DVector<f64>, y: &mut DVector<f64>) {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");
        assert_eq!(y.len(), self.rows, "Output dimension mismatch");

        for i in 0..self.rows {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];

            let mut sum = 0.0;
            for k in start..end {
                sum += self.values[k] * x[self.col_idx[k]];
            }
            y[i] += sum;
        }
    }

    /// Entrywise sum: A + B.
    pub fn add(&self, other: &CsrMatrix) -> CsrMatrix {
        assert_eq!(self.rows, other.rows, "Row dimension mismatch");
        assert_eq!(self.cols, other.cols, "Column dimension mismatch");

        let mut triplets = self.to_triplets();
        triplets.extend(other.to_triplets());
        CsrMatrix::from_triplets(self.rows, self.cols, triplets)
    }

    /// Scalar multiple: s * A.
    pub fn scale(&self, s: f64) -> CsrMatrix {
        let mut result = self.clone();
        for v in &mut result.values {
            *v *= s;
        }
        result
    }

    /// The transpose of the matrix.
    pub fn transpose(&self) -> CsrMatrix {
        let triplets: Vec<(usize, usize, f64)> = self
            .to_triplets()
            .into_iter()
            .map(|(i, j, v)| (j, i, v))
            .collect();
        CsrMatrix::from_triplets(self.cols, self.rows, triplets)
    }

    /// The contiguous block of rows and columns given by half-open ranges.
    pub fn sub_matrix(&self, row_range: Range<usize>, col_range: Range<usize>) -> CsrMatrix {
        assert!(row_range.end <= self.rows, "Row range out of bounds");
        assert!(col_range.end <= self.cols, "Column range out of bounds");

        let mut triplets = Vec::new();
        for i in row_range.clone() {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                let j = self.col_idx[k];
                if col_range.contains(&j) {
                    triplets.push((i - row_range.start, j - col_range.start, self.values[k]));
                }
            }
        }
        CsrMatrix::from_triplets(row_range.len(), col_range.len(), triplets)
    }
}

/// Solve A*x = b using the Conjugate Gradient method.
///
/// Requires A to be symmetric positive definite.
///
/// # Arguments
///
/// * `a` - The system matrix (must be symmetric positive definite)
/// * `b` - The right-hand side vector
/// * `x0` - Optional initial guess (zeros if None)
/// * `max_iter` - Maximum number of iterations
/// * `tolerance` - Convergence tolerance (relative residual norm)
///
/// # Returns
///
/// The solution vector x, or an error if convergence fails.
pub fn conjugate_gradient(
    a: &CsrMatrix,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    max_iter: usize,
    tolerance: f64,
) -> Result<DVector<f64>> {
    let n = b.len();
    assert_eq!(a.nrows(), n, "Matrix-vector dimension mismatch");
    assert_eq!(a.ncols(), n, "Matrix must be square");

    // Initial guess
    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => DVector::zeros(n),
    };

    // r = b - A*x
    let mut r = b - a.mul_vec(&x);

    // Check if initial guess is already good enough
    let b_norm = b.norm();
    if b_norm < 1e-15 {
        return Ok(x);
    }

    let mut r_norm_sq = r.dot(&r);
    if r_norm_sq.sqrt() / b_norm < tolerance {
        return Ok(x);
    }

    // p = r
    let mut p = r.clone();

    for _iter in 0..max_iter {
        // Ap = A * p
        let ap = a.mul_vec(&p);

        // alpha = (r . r) / (p . Ap)
        let p_ap = p.dot(&ap);
        if p_ap.abs() < 1e-15 {
            // Matrix might be singular or nearly so
            break;
        }
        let alpha = r_norm_sq / p_ap;

        // x = x + alpha * p
        x += alpha * &p;

        // r = r - alpha * Ap
        r -= alpha * &ap;

        // Check convergence
        let new_r_norm_sq = r.dot(&r);
        if new_r_norm_sq.sqrt() / b_norm < tolerance {
            return Ok(x);
        }

        // beta = (r_new . r_new) / (r_old . r_old)
        let beta = new_r_norm_sq / r_norm_sq;

        // p = r + beta * p
        p = &r + beta * &p;

        r_norm_sq = new_r_norm_sq;
    }

    // Did not converge
    Err(GeomError::ConvergenceFailed {
        iterations: max_iter,
    })
}
