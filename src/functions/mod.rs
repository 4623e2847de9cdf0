//! Centralized mathematical function registry
//!
//! This module provides a single source of truth for all built-in functions,
//! including their numeric evaluation and derivative formulas.

use crate::Expr;

pub(crate) mod definitions;
pub(crate) mod registry;

pub use registry::{is_builtin, function_names};

// ===== Helper functions for building derivative expressions =====

/// Create a function call expression
pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, arg)
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (a.as_number(), b.as_number()) {
        (Some(x), _) if x == 0.0 => Expr::number(0.0),
        (_, Some(x)) if x == 0.0 => Expr::number(0.0),
        (Some(x), _) if x == 1.0 => b,
        (_, Some(x)) if x == 1.0 => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    Expr::neg(e)
}

/// n! for non-negative integers; `None` outside that domain.
/// Values beyond 170! overflow to infinity like any other double.
pub(crate) fn factorial(n: f64) -> Option<f64> {
    if !crate::traits::is_integer(n) || n < 0.0 {
        return None;
    }
    if n > 170.0 {
        return Some(f64::INFINITY);
    }
    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), Some(1.0));
        assert_eq!(factorial(5.0), Some(120.0));
        assert_eq!(factorial(2.5), None);
        assert_eq!(factorial(-1.0), None);
        assert_eq!(factorial(171.0), Some(f64::INFINITY));
    }

    #[test]
    fn test_mul_opt() {
        let x = Expr::symbol("x");
        assert_eq!(mul_opt(Expr::number(1.0), x.clone()), x);
        assert_eq!(mul_opt(x.clone(), Expr::number(0.0)), Expr::number(0.0));
    }
}
