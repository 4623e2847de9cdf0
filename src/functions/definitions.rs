//! Built-in function definitions: numeric evaluation and derivative rules

use super::registry::FunctionDefinition;
use super::{func, mul_opt, neg};
use crate::Expr;

fn n(v: f64) -> Expr {
    Expr::number(v)
}

/// `u' / d`, folding to zero when `u'` is zero
fn over(u_prime: &Expr, d: Expr) -> Expr {
    if u_prime.is_zero_num() {
        return n(0.0);
    }
    Expr::div_expr(u_prime.clone(), d)
}

fn no_closed_form(_: &[Expr], _: &[Expr]) -> Option<Expr> {
    None
}

/// All functions the engine knows about
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // ===== Trigonometric =====
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |a| Some(a[0].sin()),
            derivative: |a, d| Some(mul_opt(func("cos", a[0].clone()), d[0].clone())),
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |a| Some(a[0].cos()),
            derivative: |a, d| {
                Some(neg(mul_opt(func("sin", a[0].clone()), d[0].clone())))
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |a| Some(a[0].tan()),
            derivative: |a, d| {
                let sec2 = Expr::pow(func("sec", a[0].clone()), n(2.0));
                Some(mul_opt(sec2, d[0].clone()))
            },
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |a| Some(1.0 / a[0].cos()),
            derivative: |a, d| {
                let u = &a[0];
                let inner = Expr::mul_expr(func("sec", u.clone()), func("tan", u.clone()));
                Some(mul_opt(inner, d[0].clone()))
            },
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |a| Some(1.0 / a[0].sin()),
            derivative: |a, d| {
                let u = &a[0];
                let inner = Expr::mul_expr(func("csc", u.clone()), func("cot", u.clone()));
                Some(neg(mul_opt(inner, d[0].clone())))
            },
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |a| Some(1.0 / a[0].tan()),
            derivative: |a, d| {
                let csc2 = Expr::pow(func("csc", a[0].clone()), n(2.0));
                Some(neg(mul_opt(csc2, d[0].clone())))
            },
        },
        // ===== Inverse trigonometric =====
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |a| Some(a[0].asin()),
            derivative: |a, d| {
                let root = func(
                    "sqrt",
                    Expr::sub_expr(n(1.0), Expr::pow(a[0].clone(), n(2.0))),
                );
                Some(over(&d[0], root))
            },
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |a| Some(a[0].acos()),
            derivative: |a, d| {
                let root = func(
                    "sqrt",
                    Expr::sub_expr(n(1.0), Expr::pow(a[0].clone(), n(2.0))),
                );
                Some(neg(over(&d[0], root)))
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |a| Some(a[0].atan()),
            derivative: |a, d| {
                let denom = Expr::add_expr(n(1.0), Expr::pow(a[0].clone(), n(2.0)));
                Some(over(&d[0], denom))
            },
        },
        FunctionDefinition {
            name: "atan2",
            arity: 2..=2,
            eval: |a| Some(a[0].atan2(a[1])),
            derivative: |a, d| {
                // d/dt atan2(y, x) = (x*y' - y*x') / (x^2 + y^2)
                let (y, x) = (&a[0], &a[1]);
                let num = Expr::sub_expr(
                    mul_opt(x.clone(), d[0].clone()),
                    mul_opt(y.clone(), d[1].clone()),
                );
                let denom = Expr::add_expr(
                    Expr::pow(x.clone(), n(2.0)),
                    Expr::pow(y.clone(), n(2.0)),
                );
                Some(Expr::div_expr(num, denom))
            },
        },
        // ===== Hyperbolic =====
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |a| Some(a[0].sinh()),
            derivative: |a, d| Some(mul_opt(func("cosh", a[0].clone()), d[0].clone())),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |a| Some(a[0].cosh()),
            derivative: |a, d| Some(mul_opt(func("sinh", a[0].clone()), d[0].clone())),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |a| Some(a[0].tanh()),
            derivative: |a, d| {
                let cosh2 = Expr::pow(func("cosh", a[0].clone()), n(2.0));
                Some(over(&d[0], cosh2))
            },
        },
        // ===== Roots, exponentials, logarithms =====
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |a| Some(a[0].sqrt()),
            derivative: |a, d| {
                Some(over(
                    &d[0],
                    Expr::mul_expr(n(2.0), func("sqrt", a[0].clone())),
                ))
            },
        },
        FunctionDefinition {
            name: "cbrt",
            arity: 1..=1,
            eval: |a| Some(a[0].cbrt()),
            derivative: |a, d| {
                let denom = Expr::mul_expr(
                    n(3.0),
                    Expr::pow(func("cbrt", a[0].clone()), n(2.0)),
                );
                Some(over(&d[0], denom))
            },
        },
        FunctionDefinition {
            name: "nthroot",
            arity: 2..=2,
            eval: |a| Some(nth_root(a[0], a[1])),
            derivative: |a, d| {
                // Only defined for a constant root index
                if !d[1].is_zero_num() {
                    return None;
                }
                let (u, k) = (&a[0], &a[1]);
                let denom = Expr::mul_expr(
                    k.clone(),
                    Expr::pow(
                        Expr::func_multi("nthroot", vec![u.clone(), k.clone()]),
                        Expr::sub_expr(k.clone(), n(1.0)),
                    ),
                );
                Some(over(&d[0], denom))
            },
        },
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |a| Some(a[0].exp()),
            derivative: |a, d| Some(mul_opt(func("exp", a[0].clone()), d[0].clone())),
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |a| Some(a[0].ln()),
            derivative: |a, d| Some(over(&d[0], a[0].clone())),
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |a| match a {
                [x] => Some(x.ln()),
                [x, base] => Some(x.ln() / base.ln()),
                _ => None,
            },
            derivative: |a, d| match (a, d) {
                ([u], [du]) => Some(over(du, u.clone())),
                ([u, b], [du, db]) if db.is_zero_num() => Some(over(
                    du,
                    Expr::mul_expr(u.clone(), func("ln", b.clone())),
                )),
                ([u, b], [du, db]) => {
                    // log_b(u) = ln(u) / ln(b), quotient rule
                    let ln_b = func("ln", b.clone());
                    let ln_u = func("ln", u.clone());
                    let num = Expr::sub_expr(
                        Expr::mul_expr(over(du, u.clone()), ln_b.clone()),
                        Expr::mul_expr(ln_u, over(db, b.clone())),
                    );
                    Some(Expr::div_expr(num, Expr::pow(ln_b, n(2.0))))
                }
                _ => None,
            },
        },
        FunctionDefinition {
            name: "log10",
            arity: 1..=1,
            eval: |a| Some(a[0].log10()),
            derivative: |a, d| {
                Some(over(
                    &d[0],
                    Expr::mul_expr(a[0].clone(), func("ln", n(10.0))),
                ))
            },
        },
        FunctionDefinition {
            name: "log2",
            arity: 1..=1,
            eval: |a| Some(a[0].log2()),
            derivative: |a, d| {
                Some(over(
                    &d[0],
                    Expr::mul_expr(a[0].clone(), func("ln", n(2.0))),
                ))
            },
        },
        // ===== Piecewise and rounding =====
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |a| Some(a[0].abs()),
            derivative: |a, d| {
                let u = &a[0];
                let sign = Expr::div_expr(u.clone(), func("abs", u.clone()));
                Some(mul_opt(sign, d[0].clone()))
            },
        },
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            eval: |a| Some(signum(a[0])),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "floor",
            arity: 1..=1,
            eval: |a| Some(a[0].floor()),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "ceil",
            arity: 1..=1,
            eval: |a| Some(a[0].ceil()),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "round",
            arity: 1..=1,
            eval: |a| Some(a[0].round()),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "factorial",
            arity: 1..=1,
            eval: |a| super::factorial(a[0]),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "min",
            arity: 1..=usize::MAX,
            eval: |a| Some(a.iter().copied().fold(f64::INFINITY, f64::min)),
            derivative: no_closed_form,
        },
        FunctionDefinition {
            name: "max",
            arity: 1..=usize::MAX,
            eval: |a| Some(a.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            derivative: no_closed_form,
        },
    ]
}

/// Sign with `sign(0) = 0`
fn signum(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

/// Real n-th root; odd roots of negative numbers stay real
fn nth_root(x: f64, k: f64) -> f64 {
    if x < 0.0 && crate::traits::is_integer(k) && (k as i64) % 2 != 0 {
        -(-x).powf(1.0 / k)
    } else {
        x.powf(1.0 / k)
    }
}
