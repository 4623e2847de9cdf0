//! Constant folding and identity rules

use super::{Rule, binary_parts};
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::traits::is_integer;

/// Value of a node whose operands are all literals.
/// Division and powers only fold when the result is a whole number, so
/// `1/3` and `2^0.5` stay exact in the output.
fn fold(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::Unary { op, operand } => {
            let v = operand.as_number()?;
            match op {
                UnaryOp::Neg => Some(-v),
                UnaryOp::Factorial => crate::functions::factorial(v),
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let (a, b) = (lhs.as_number()?, rhs.as_number()?);
            let v = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Pow => a.powf(b),
                BinaryOp::Mod => crate::evaluator::floored_mod(a, b),
            };
            match op {
                BinaryOp::Div | BinaryOp::Pow if !is_integer(v) => None,
                _ => Some(v),
            }
        }
        _ => None,
    }
}

rule!(ConstantFoldRule, "constant_fold", 200, [Neg, Factorial, Add, Sub, Mul, Div, Pow, Mod], |expr| {
    fold(expr)
        .filter(|v| v.is_finite())
        .map(Expr::number)
});

rule!(AddZeroRule, "add_zero", 100, [Add], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Add)?;
    if u.is_zero_num() {
        Some(v.clone())
    } else if v.is_zero_num() {
        Some(u.clone())
    } else {
        None
    }
});

rule!(SubZeroRule, "sub_zero", 100, [Sub], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Sub)?;
    if v.is_zero_num() {
        Some(u.clone())
    } else if u.is_zero_num() {
        Some(Expr::neg(v.clone()))
    } else {
        None
    }
});

rule!(MulZeroRule, "mul_zero", 100, [Mul], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    (u.is_zero_num() || v.is_zero_num()).then(|| Expr::number(0.0))
});

rule!(MulOneRule, "mul_one", 100, [Mul], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Mul)?;
    if u.is_one_num() {
        Some(v.clone())
    } else if v.is_one_num() {
        Some(u.clone())
    } else {
        None
    }
});

rule!(DivOneRule, "div_one", 100, [Div], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Div)?;
    v.is_one_num().then(|| u.clone())
});

rule!(ZeroDivRule, "zero_div", 100, [Div], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Div)?;
    (u.is_zero_num() && !v.is_zero_num()).then(|| Expr::number(0.0))
});

rule!(PowZeroRule, "pow_zero", 100, [Pow], |expr| {
    let (_, v) = binary_parts(expr, BinaryOp::Pow)?;
    v.is_zero_num().then(|| Expr::number(1.0))
});

rule!(PowOneRule, "pow_one", 100, [Pow], |expr| {
    let (u, v) = binary_parts(expr, BinaryOp::Pow)?;
    if v.is_one_num() {
        Some(u.clone())
    } else if u.is_one_num() {
        Some(Expr::number(1.0))
    } else {
        None
    }
});

pub(crate) fn get_numeric_rules() -> Vec<&'static dyn Rule> {
    vec![
        &ConstantFoldRule,
        &AddZeroRule,
        &SubZeroRule,
        &MulZeroRule,
        &MulOneRule,
        &DivOneRule,
        &ZeroDivRule,
        &PowZeroRule,
        &PowOneRule,
    ]
}
