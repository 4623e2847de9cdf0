//! Sign normalization, coefficient collection and like-term rules

use super::{Rule, binary_parts, neg_operand};
use crate::ast::{BinaryOp, Expr};

/// Negative numeric literal as its magnitude
fn negative_literal(e: &Expr) -> Option<f64> {
    e.as_number().filter(|n| *n < 0.0).map(|n| -n)
}

/// Split a term into (coefficient, rest): `3*x` → (3, x), `-x` → (-1, x)
fn coefficient_and_term(e: &Expr) -> Option<(f64, Expr)> {
    if e.as_number().is_some() {
        return None;
    }
    if let Some(inner) = neg_operand(e) {
        return coefficient_and_term(inner).map(|(c, t)| (-c, t));
    }
    if let Some((lhs, rhs)) = binary_parts(e, BinaryOp::Mul)
        && let Some(c) = lhs.as_number()
    {
        return Some((c, rhs.clone()));
    }
    Some((1.0, e.clone()))
}

/// Split a factor into (base, exponent): `x^3` → (x, 3), `x` → (x, 1)
fn base_and_exponent(e: &Expr) -> (Expr, Expr) {
    match binary_parts(e, BinaryOp::Pow) {
        Some((base, exp)) => (base.clone(), exp.clone()),
        None => (e.clone(), Expr::number(1.0)),
    }
}

rule!(DoubleNegRule, "double_neg", 90, [Neg], |expr| {
    neg_operand(neg_operand(expr)?).cloned()
});

rule!(AddNegRule, "add_neg", 80, [Add], |expr| {
    // a + (-b) → a - b, (-a) + b → b - a, a + (-3) → a - 3
    let (u, v) = binary_parts(expr, BinaryOp::Add)?;
    if let Some(b) = neg_operand(v) {
        return Some(Expr::sub_expr(u.clone(), b.clone()));
    }
    if let Some(n) = negative_literal(v) {
        return Some(Expr::sub_expr(u.clone(), Expr::number(n)));
    }
    if let Some(a) = neg_operand(u) {
        return Some(Expr::sub_expr(v.clone(), a.clone()));
    }
    None
});

rule!(SubNegRule, "sub_neg", 80, [Sub], |expr| {
    // a - (-b) → a + b, a - (-3) → a + 3
    let (u, v) = binary_parts(expr, BinaryOp::Sub)?;
    if let Some(b) = neg_operand(v) {
        return Some(Expr::add_expr(u.clone(), b.clone()));
    }
    negative_literal(v).map(|n| Expr::add_expr(u.clone(), Expr::number(n)))
});

rule!(SubSelfRule, "sub_self", 85, [Sub], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Sub)?;
    (u == v).then(|| Expr::number(0.0))
});

rule!(MulNegRule, "mul_neg", 80, [Mul], |expr| {
    // Pull signs out of products: (-a)*b, a*(-b), (-3)*b → -(…)
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    if let Some(a) = neg_operand(u) {
        return Some(Expr::neg(Expr::mul_expr(a.clone(), v.clone())));
    }
    if let Some(b) = neg_operand(v) {
        return Some(Expr::neg(Expr::mul_expr(u.clone(), b.clone())));
    }
    if v.as_number().is_none()
        && let Some(n) = negative_literal(u)
    {
        return Some(Expr::neg(Expr::mul_expr(Expr::number(n), v.clone())));
    }
    None
});

rule!(DivNegRule, "div_neg", 80, [Div], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Div)?;
    if let Some(a) = neg_operand(u) {
        return Some(Expr::neg(Expr::div_expr(a.clone(), v.clone())));
    }
    if let Some(b) = neg_operand(v) {
        return Some(Expr::neg(Expr::div_expr(u.clone(), b.clone())));
    }
    None
});

rule!(MulCanonicalRule, "mul_canonical", 70, [Mul], |expr| {
    // Coefficients go first: x*3 → 3*x
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    (u.as_number().is_none() && v.as_number().is_some())
        .then(|| Expr::mul_expr(v.clone(), u.clone()))
});

rule!(MulCoefficientRule, "mul_coefficient", 60, [Mul], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    // n * (m * x) → (n*m) * x
    if let Some(n) = u.as_number()
        && let Some((inner_l, inner_r)) = binary_parts(v, BinaryOp::Mul)
        && let Some(m) = inner_l.as_number()
    {
        return Some(Expr::mul_expr(Expr::number(n * m), inner_r.clone()));
    }
    // (n * a) * b → n * (a * b)
    if v.as_number().is_none()
        && let Some((inner_l, inner_r)) = binary_parts(u, BinaryOp::Mul)
        && let Some(n) = inner_l.as_number()
    {
        return Some(Expr::mul_expr(
            Expr::number(n),
            Expr::mul_expr(inner_r.clone(), v.clone()),
        ));
    }
    // a * (n * b) → n * (a * b)
    if u.as_number().is_none()
        && let Some((inner_l, inner_r)) = binary_parts(v, BinaryOp::Mul)
        && let Some(n) = inner_l.as_number()
    {
        return Some(Expr::mul_expr(
            Expr::number(n),
            Expr::mul_expr(u.clone(), inner_r.clone()),
        ));
    }
    None
});

rule!(LikeTermsRule, "like_terms", 50, [Add, Sub], |expr| {
    // 2x + 3x → 5x, x - 4x → -3x
    let (op, u, v) = match binary_parts(expr, BinaryOp::Add) {
        Some((u, v)) => (BinaryOp::Add, u, v),
        None => {
            let (u, v) = binary_parts(expr, BinaryOp::Sub)?;
            (BinaryOp::Sub, u, v)
        }
    };
    let (c1, t1) = coefficient_and_term(u)?;
    let (c2, t2) = coefficient_and_term(v)?;
    if t1 != t2 {
        return None;
    }
    let c = if op == BinaryOp::Add { c1 + c2 } else { c1 - c2 };
    Some(Expr::mul_expr(Expr::number(c), t1))
});

rule!(MulSameBaseRule, "mul_same_base", 50, [Mul], |expr| {
    // x * x → x^2, x^a * x^b → x^(a+b)
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    if u.as_number().is_some() || v.as_number().is_some() {
        return None;
    }
    let (b1, e1) = base_and_exponent(u);
    let (b2, e2) = base_and_exponent(v);
    (b1 == b2).then(|| Expr::pow(b1, Expr::add_expr(e1, e2)))
});

rule!(PowPowRule, "pow_pow", 50, [Pow], |expr| {
    // (x^a)^n → x^(a*n) for integer n
    let (u, v) = binary_parts(expr, BinaryOp::Pow)?;
    let n = v.as_number().filter(|n| crate::traits::is_integer(*n))?;
    let (base, inner) = binary_parts(u, BinaryOp::Pow)?;
    let a = inner.as_number()?;
    Some(Expr::pow(base.clone(), Expr::number(a * n)))
});

pub(crate) fn get_algebraic_rules() -> Vec<&'static dyn Rule> {
    vec![
        &DoubleNegRule,
        &AddNegRule,
        &SubNegRule,
        &SubSelfRule,
        &MulNegRule,
        &DivNegRule,
        &MulCanonicalRule,
        &MulCoefficientRule,
        &LikeTermsRule,
        &MulSameBaseRule,
        &PowPowRule,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_like_terms() {
        let e = Expr::add_expr(Expr::mul_expr(Expr::number(2.0), x()), x());
        assert_eq!(
            LikeTermsRule.apply(&e),
            Some(Expr::mul_expr(Expr::number(3.0), x()))
        );
    }

    #[test]
    fn test_mul_canonical() {
        let e = Expr::mul_expr(x(), Expr::number(3.0));
        assert_eq!(
            MulCanonicalRule.apply(&e),
            Some(Expr::mul_expr(Expr::number(3.0), x()))
        );
    }

    #[test]
    fn test_signs() {
        let e = Expr::add_expr(x(), Expr::neg(Expr::symbol("y")));
        assert_eq!(
            AddNegRule.apply(&e),
            Some(Expr::sub_expr(x(), Expr::symbol("y")))
        );
        let e = Expr::neg(Expr::neg(x()));
        assert_eq!(DoubleNegRule.apply(&e), Some(x()));
    }

    #[test]
    fn test_same_base() {
        let e = Expr::mul_expr(x(), x());
        assert_eq!(
            MulSameBaseRule.apply(&e),
            Some(Expr::pow(x(), Expr::add_expr(Expr::number(1.0), Expr::number(1.0))))
        );
    }
}
