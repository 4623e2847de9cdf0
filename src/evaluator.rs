//! Tree-walking interpreter for parsed formulas
//!
//! Evaluation follows IEEE-754 double semantics: `1/0` is `Infinity` and
//! `sqrt(-1)` is `NaN`. Only name resolution, arity and a few integer-only
//! operations (factorial) produce errors here; callers decide how to report
//! non-finite results.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{CalcError, CalcResult};
use crate::functions::registry::Registry;
use crate::visitor::ExprVisitor;
use serde::{Deserialize, Serialize};

/// Angle unit used by `sin`, `cos` and `tan`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
}

/// Options that change how a formula is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalOptions {
    pub angle: AngleMode,
}

impl EvalOptions {
    pub fn degrees() -> Self {
        EvalOptions {
            angle: AngleMode::Degrees,
        }
    }
}

/// Named constants available in every formula
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" | "E" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        "phi" => Some(1.618_033_988_749_895),
        "Infinity" => Some(f64::INFINITY),
        _ => None,
    }
}

/// Floored modulo: the result takes the sign of the divisor, `a mod 0 = a`
pub(crate) fn floored_mod(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return a;
    }
    a - b * (a / b).floor()
}

struct Evaluator<'a> {
    vars: &'a [(&'a str, f64)],
    options: &'a EvalOptions,
}

impl ExprVisitor for Evaluator<'_> {
    type Output = CalcResult<f64>;

    fn visit_number(&mut self, n: f64) -> CalcResult<f64> {
        Ok(n)
    }

    fn visit_symbol(&mut self, name: &str) -> CalcResult<f64> {
        // Bindings shadow constants
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
            .or_else(|| constant(name))
            .ok_or_else(|| CalcError::UnknownVariable(name.to_string()))
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr) -> CalcResult<f64> {
        let v = operand.accept(self)?;
        match op {
            UnaryOp::Neg => Ok(-v),
            UnaryOp::Factorial => crate::functions::factorial(v).ok_or_else(|| {
                CalcError::domain(format!(
                    "factorial is only defined for non-negative integers, got {}",
                    v
                ))
            }),
        }
    }

    fn visit_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> CalcResult<f64> {
        let a = lhs.accept(self)?;
        let b = rhs.accept(self)?;
        Ok(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
            BinaryOp::Mod => floored_mod(a, b),
        })
    }

    fn visit_function(&mut self, name: &str, args: &[Expr]) -> CalcResult<f64> {
        let def =
            Registry::get(name).ok_or_else(|| CalcError::UnknownFunction(name.to_string()))?;

        if !def.validate_arity(args.len()) {
            return Err(CalcError::ArityMismatch {
                name: name.to_string(),
                expected: def.arity_description(),
                got: args.len(),
            });
        }

        let mut values = args
            .iter()
            .map(|a| a.accept(self))
            .collect::<CalcResult<Vec<f64>>>()?;

        if self.options.angle == AngleMode::Degrees && matches!(name, "sin" | "cos" | "tan") {
            values[0] = values[0].to_radians();
        }

        (def.eval)(&values).ok_or_else(|| {
            CalcError::domain(format!("{} is undefined for {:?}", name, values))
        })
    }
}

impl Expr {
    /// Evaluate with variable bindings, angles in radians
    ///
    /// # Example
    /// ```
    /// let expr = graphium::parse("x^2 + y").unwrap();
    /// assert_eq!(expr.eval(&[("x", 3.0), ("y", 1.0)]).unwrap(), 10.0);
    /// ```
    pub fn eval(&self, vars: &[(&str, f64)]) -> CalcResult<f64> {
        self.eval_with(vars, &EvalOptions::default())
    }

    /// Evaluate with variable bindings and explicit options
    pub fn eval_with(&self, vars: &[(&str, f64)], options: &EvalOptions) -> CalcResult<f64> {
        let mut evaluator = Evaluator { vars, options };
        self.accept(&mut evaluator)
    }

    /// View the expression as a function of a single variable
    pub fn to_fn<'a>(&'a self, var: &'a str) -> impl Fn(f64) -> CalcResult<f64> + 'a {
        move |x| self.eval(&[(var, x)])
    }
}
