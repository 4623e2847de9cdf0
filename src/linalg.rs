//! Dense linear algebra for least-squares fitting, backed by nalgebra

use crate::error::{CalcError, CalcResult};
use nalgebra::{DMatrix, DVector};

/// Pivots this small relative to the largest one count as zero
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// `n × (degree + 1)` design matrix with column `j` holding `x^j`
pub fn vandermonde(x: &[f64], degree: usize) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), degree + 1, |i, j| x[i].powi(j as i32))
}

/// Solve `A·v = b` by LU decomposition with partial pivoting
///
/// A singular `A` (a vanishing pivot, or a solution that is not finite) is
/// reported as [`CalcError::SingularMatrix`].
pub fn lu_solve(a: DMatrix<f64>, b: &DVector<f64>) -> CalcResult<DVector<f64>> {
    if !a.is_square() || a.nrows() != b.len() {
        return Err(CalcError::invalid_input(format!(
            "cannot solve a {}x{} system against {} values",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }
    let lu = a.lu();
    let pivots = lu.u().diagonal();
    let scale = pivots.amax();
    if scale == 0.0 || pivots.iter().any(|p| p.abs() <= scale * SINGULAR_TOLERANCE) {
        return Err(CalcError::SingularMatrix);
    }
    let solution = lu.solve(b).ok_or(CalcError::SingularMatrix)?;
    if solution.iter().all(|v| v.is_finite()) {
        Ok(solution)
    } else {
        Err(CalcError::SingularMatrix)
    }
}

/// Matrix product `A·B`
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> CalcResult<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(CalcError::invalid_input(format!(
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    Ok(a * b)
}

/// Build a matrix from rows, rejecting ragged input
pub fn from_rows(rows: &[Vec<f64>]) -> CalcResult<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(CalcError::invalid_input("matrix rows have different lengths"));
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Least-squares coefficients via the normal equations `(XᵀX)β = Xᵀy`
pub fn normal_equations(design: &DMatrix<f64>, y: &[f64]) -> CalcResult<DVector<f64>> {
    let y = DVector::from_column_slice(y);
    let xt = design.transpose();
    lu_solve(&xt * design, &(&xt * y))
}
