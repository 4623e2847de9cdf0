// Display formatting for AST
//
// Infix output with the minimal parentheses needed to read back the same
// tree: `3 * x^2 - 2`, `(x + 1)^2`, `x^(-1)`, `-(a + b)`.
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use std::fmt;

/// Binding strength of the node at the top of `e`
fn strength(e: &Expr) -> u8 {
    match &e.kind {
        ExprKind::Number(n) if *n < 0.0 => 25,
        ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => 100,
        ExprKind::Unary {
            op: UnaryOp::Neg, ..
        } => 25,
        ExprKind::Unary {
            op: UnaryOp::Factorial,
            ..
        } => 40,
        ExprKind::Binary { op, .. } => op.precedence(),
    }
}

fn starts_negative(e: &Expr) -> bool {
    strength(e) == 25
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, e: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // Display as integer if no fractional part
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write_number(f, *n),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }

            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                write!(f, "-")?;
                // -a*b has the value of -(a*b) but -a mod 3 is (-a) mod 3, so
                // a mod needs parens like sums and nested signs do
                let is_mod = matches!(&operand.kind, ExprKind::Binary { op: BinaryOp::Mod, .. });
                let wrap = strength(operand) < 20 || is_mod || starts_negative(operand);
                write_wrapped(f, operand, wrap)
            }

            ExprKind::Unary {
                op: UnaryOp::Factorial,
                operand,
            } => {
                write_wrapped(f, operand, strength(operand) < 100)?;
                write!(f, "!")
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let p = op.precedence();
                let lhs_wrap = match op {
                    // Base of a power: only atoms and factorials go bare
                    BinaryOp::Pow => strength(lhs) <= p,
                    _ => strength(lhs) < p,
                };
                let rhs_wrap = match op {
                    BinaryOp::Pow => strength(rhs) < p,
                    BinaryOp::Sub | BinaryOp::Div | BinaryOp::Mod => {
                        strength(rhs) <= p || starts_negative(rhs)
                    }
                    BinaryOp::Add | BinaryOp::Mul => strength(rhs) < p || starts_negative(rhs),
                };

                write_wrapped(f, lhs, lhs_wrap)?;
                match op {
                    BinaryOp::Pow => write!(f, "^")?,
                    _ => write!(f, " {} ", op.symbol())?,
                }
                write_wrapped(f, rhs, rhs_wrap)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn n(v: f64) -> Expr {
        Expr::number(v)
    }

    #[test]
    fn test_numbers() {
        assert_eq!(n(3.0).to_string(), "3");
        assert_eq!(n(0.25).to_string(), "0.25");
        assert_eq!(n(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_polynomial() {
        let e = Expr::sub_expr(Expr::mul_expr(n(3.0), Expr::pow(x(), n(2.0))), n(2.0));
        assert_eq!(e.to_string(), "3 * x^2 - 2");
    }

    #[test]
    fn test_parenthesization() {
        let e = Expr::pow(Expr::add_expr(x(), n(1.0)), n(2.0));
        assert_eq!(e.to_string(), "(x + 1)^2");

        let e = Expr::sub_expr(x(), Expr::add_expr(x(), n(1.0)));
        assert_eq!(e.to_string(), "x - (x + 1)");

        let e = Expr::div_expr(x(), Expr::mul_expr(n(2.0), x()));
        assert_eq!(e.to_string(), "x / (2 * x)");

        let e = Expr::pow(x(), n(-1.0));
        assert_eq!(e.to_string(), "x^(-1)");

        let e = Expr::pow(Expr::neg(x()), n(2.0));
        assert_eq!(e.to_string(), "(-x)^2");

        let e = Expr::pow(x(), Expr::pow(x(), n(2.0)));
        assert_eq!(e.to_string(), "x^x^2");
    }

    #[test]
    fn test_unary() {
        assert_eq!(Expr::neg(Expr::add_expr(x(), n(1.0))).to_string(), "-(x + 1)");
        assert_eq!(Expr::neg(Expr::func("sin", x())).to_string(), "-sin(x)");
        assert_eq!(
            Expr::unary(UnaryOp::Factorial, Expr::add_expr(x(), n(1.0))).to_string(),
            "(x + 1)!"
        );
        assert_eq!(
            Expr::binary(BinaryOp::Mod, x(), n(3.0)).to_string(),
            "x mod 3"
        );
    }

    #[test]
    fn test_round_trip_value() {
        for src in ["-(x + 1)^2 / (3 - x)", "2^-x", "x mod 3 * 2", "(-x)^3!"] {
            let e = crate::parse(src).unwrap();
            let back = crate::parse(&e.to_string()).unwrap();
            let a = e.eval(&[("x", 0.7)]).unwrap();
            let b = back.eval(&[("x", 0.7)]).unwrap();
            assert!((a - b).abs() < 1e-12 || (a.is_nan() && b.is_nan()), "{}", src);
        }
    }

    #[test]
    fn test_negated_mod_keeps_its_parentheses() {
        let e = crate::parse("-(a mod 3)").unwrap();
        assert_eq!(e.to_string(), "-(a mod 3)");
        assert_eq!(crate::parse("(-a) mod 3").unwrap().to_string(), "-a mod 3");

        for src in ["-(a mod 3)", "-(a mod 3) * 2", "2 - -(a mod -4)", "-(-a mod 3)"] {
            let e = crate::parse(src).unwrap();
            let back = crate::parse(&e.to_string()).unwrap();
            assert_eq!(back, e, "{src} printed as {e}");
            for a in [-7.0, 5.0, 2.5] {
                let vars = [("a", a)];
                assert_eq!(e.eval(&vars).unwrap(), back.eval(&vars).unwrap(), "{src} at {a}");
            }
        }
    }
}
