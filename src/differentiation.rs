// Differentiation engine - applies calculus rules
//
// Trivial zero/one operands are folded while the derivative is built so that
// expressions like sin(x^5)' stay small; the simplifier handles the rest.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::{CalcError, CalcResult};
use crate::functions::mul_opt;
use crate::functions::registry::Registry;

fn add_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        b
    } else if b.is_zero_num() {
        a
    } else {
        Expr::add_expr(a, b)
    }
}

fn sub_opt(a: Expr, b: Expr) -> Expr {
    if b.is_zero_num() {
        a
    } else if a.is_zero_num() {
        Expr::neg(b)
    } else {
        Expr::sub_expr(a, b)
    }
}

fn is_euler(e: &Expr) -> bool {
    matches!(&e.kind, ExprKind::Symbol(s) if s == "e")
}

impl Expr {
    /// Symbolic derivative with respect to `var`, simplified for display
    ///
    /// # Example
    /// ```
    /// let f = graphium::parse("x^3 - 2*x - 5").unwrap();
    /// let df = f.derivative("x").unwrap();
    /// assert_eq!(df.to_string(), "3 * x^2 - 2");
    /// ```
    ///
    /// # Errors
    /// `NotDifferentiable` for functions without a closed-form rule
    /// (`floor`, `mod`, `factorial`, ...) applied to something that depends on `var`.
    pub fn derivative(&self, var: &str) -> CalcResult<Expr> {
        let raw = self.derive(var)?;
        Ok(crate::simplification::simplify(raw))
    }

    /// Unsimplified derivative
    pub(crate) fn derive(&self, var: &str) -> CalcResult<Expr> {
        // Anything that does not mention the variable is a constant
        if !self.contains_var(var) {
            return Ok(Expr::number(0.0));
        }

        match &self.kind {
            ExprKind::Number(_) => Ok(Expr::number(0.0)),

            ExprKind::Symbol(name) => Ok(Expr::number(if name == var { 1.0 } else { 0.0 })),

            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Neg => {
                    let d = operand.derive(var)?;
                    Ok(if d.is_zero_num() { d } else { Expr::neg(d) })
                }
                UnaryOp::Factorial => Err(CalcError::NotDifferentiable("factorial".to_string())),
            },

            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get(name)
                    .ok_or_else(|| CalcError::UnknownFunction(name.clone()))?;
                if !def.validate_arity(args.len()) {
                    return Err(CalcError::ArityMismatch {
                        name: name.clone(),
                        expected: def.arity_description(),
                        got: args.len(),
                    });
                }
                let arg_primes = args
                    .iter()
                    .map(|a| a.derive(var))
                    .collect::<CalcResult<Vec<Expr>>>()?;
                (def.derivative)(args, &arg_primes)
                    .ok_or_else(|| CalcError::NotDifferentiable(name.clone()))
            }

            ExprKind::Binary { op, lhs: u, rhs: v } => match op {
                // Sum rule: (u + v)' = u' + v'
                BinaryOp::Add => Ok(add_opt(u.derive(var)?, v.derive(var)?)),

                // Subtraction rule: (u - v)' = u' - v'
                BinaryOp::Sub => Ok(sub_opt(u.derive(var)?, v.derive(var)?)),

                // Product rule: (u * v)' = u' * v + u * v'
                BinaryOp::Mul => {
                    let u_prime = u.derive(var)?;
                    let v_prime = v.derive(var)?;
                    let term1 = mul_opt(u_prime, (**v).clone());
                    let term2 = mul_opt((**u).clone(), v_prime);
                    Ok(add_opt(term1, term2))
                }

                // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
                BinaryOp::Div => {
                    let u_prime = u.derive(var)?;
                    if !v.contains_var(var) {
                        // Constant denominator: u' / v
                        return Ok(if u_prime.is_zero_num() {
                            u_prime
                        } else {
                            Expr::div_expr(u_prime, (**v).clone())
                        });
                    }
                    let v_prime = v.derive(var)?;
                    let numerator = sub_opt(
                        mul_opt(u_prime, (**v).clone()),
                        mul_opt((**u).clone(), v_prime),
                    );
                    Ok(Expr::div_expr(
                        numerator,
                        Expr::pow((**v).clone(), Expr::number(2.0)),
                    ))
                }

                BinaryOp::Pow => derive_pow(u, v, var),

                BinaryOp::Mod => Err(CalcError::NotDifferentiable("mod".to_string())),
            },
        }
    }
}

fn derive_pow(u: &Expr, v: &Expr, var: &str) -> CalcResult<Expr> {
    if !v.contains_var(var) {
        // Constant exponent: (u^n)' = n * u^(n-1) * u'
        let u_prime = u.derive(var)?;
        let n_minus_1 = match v.as_number() {
            Some(n) if n == 1.0 => return Ok(u_prime),
            Some(n) => Expr::number(n - 1.0),
            None => Expr::sub_expr(v.clone(), Expr::number(1.0)),
        };
        let power = if n_minus_1.is_one_num() {
            u.clone()
        } else {
            Expr::pow(u.clone(), n_minus_1)
        };
        return Ok(mul_opt(Expr::mul_expr(v.clone(), power), u_prime));
    }

    let v_prime = v.derive(var)?;
    let u_to_v = Expr::pow(u.clone(), v.clone());

    if !u.contains_var(var) {
        // Constant base: (a^v)' = a^v * ln(a) * v'
        let scaled = if is_euler(u) {
            u_to_v
        } else {
            Expr::mul_expr(u_to_v, Expr::func("ln", u.clone()))
        };
        return Ok(mul_opt(scaled, v_prime));
    }

    // General case by logarithmic differentiation:
    // (u^v)' = u^v * (v' * ln(u) + v * u' / u)
    let u_prime = u.derive(var)?;
    let inner = add_opt(
        mul_opt(v_prime, Expr::func("ln", u.clone())),
        mul_opt(v.clone(), Expr::div_expr(u_prime, u.clone())),
    );
    Ok(mul_opt(u_to_v, inner))
}
