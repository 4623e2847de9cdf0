//! Simplification framework - reduces expressions
pub(crate) mod engine;
mod rules;

use crate::Expr;

/// Simplify an expression with the default rule set
///
/// Folds constants, removes additive/multiplicative identities, normalizes
/// signs and collects numeric coefficients and like terms.
pub fn simplify(expr: Expr) -> Expr {
    engine::Simplifier::new().simplify(expr)
}

impl Expr {
    /// Simplified copy of this expression
    pub fn simplified(&self) -> Expr {
        simplify(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn simp(s: &str) -> String {
        simplify(parse(s).unwrap()).to_string()
    }

    #[test]
    fn test_identities() {
        assert_eq!(simp("x + 0"), "x");
        assert_eq!(simp("1 * x"), "x");
        assert_eq!(simp("x^1"), "x");
        assert_eq!(simp("x^0"), "1");
        assert_eq!(simp("0 / x"), "0");
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(simp("2 + 3 * 4"), "14");
        assert_eq!(simp("1 / 3"), "1 / 3");
        assert_eq!(simp("6 / 3"), "2");
    }

    #[test]
    fn test_collect() {
        assert_eq!(simp("x + x"), "2 * x");
        assert_eq!(simp("x * 3"), "3 * x");
        assert_eq!(simp("2 * (3 * x)"), "6 * x");
        assert_eq!(simp("x * x"), "x^2");
        assert_eq!(simp("x - x"), "0");
    }

    #[test]
    fn test_signs() {
        assert_eq!(simp("x + -y"), "x - y");
        assert_eq!(simp("x - -3"), "x + 3");
        assert_eq!(simp("-(-x)"), "x");
    }

    #[test]
    fn test_fixpoint_is_stable() {
        let once = simplify(parse("3*x^2 - 2").unwrap());
        let twice = simplify(once.clone());
        assert_eq!(once, twice);
    }
}
