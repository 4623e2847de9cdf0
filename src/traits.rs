//! Float helpers shared by the simplifier and the numeric modules

use num_traits::Float;

/// Finite with no fractional part
#[inline]
pub(crate) fn is_integer<T: Float>(n: T) -> bool {
    n.is_finite() && n.fract() == T::zero()
}

/// Both coordinates agree within `tol`
#[inline]
pub(crate) fn same_point<T: Float>(a: (T, T), b: (T, T), tol: T) -> bool {
    (a.0 - b.0).abs() < tol && (a.1 - b.1).abs() < tol
}
