//! Expression visitor pattern for AST traversal
//!
//! Every consumer of the tree (the interpreter, variable collection)
//! implements [`ExprVisitor`] and is driven by [`Expr::accept`], so the
//! recursive structure is matched in exactly one place.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use std::collections::HashSet;

/// Trait for visiting expression nodes in the AST
///
/// The visitor decides itself whether and when to descend into children by
/// calling `accept` on them, which lets an interpreter short-circuit on the
/// first error while a collector walks everything.
///
/// # Example
/// ```
/// use graphium::{Expr, ExprVisitor, BinaryOp, UnaryOp};
///
/// struct Leaves(usize);
///
/// impl ExprVisitor for Leaves {
///     type Output = ();
///     fn visit_number(&mut self, _n: f64) { self.0 += 1; }
///     fn visit_symbol(&mut self, _name: &str) { self.0 += 1; }
///     fn visit_unary(&mut self, _op: UnaryOp, operand: &Expr) { operand.accept(self) }
///     fn visit_binary(&mut self, _op: BinaryOp, lhs: &Expr, rhs: &Expr) {
///         lhs.accept(self);
///         rhs.accept(self);
///     }
///     fn visit_function(&mut self, _name: &str, args: &[Expr]) {
///         args.iter().for_each(|a| a.accept(self));
///     }
/// }
///
/// let expr = graphium::parse("x + 2*y").unwrap();
/// let mut leaves = Leaves(0);
/// expr.accept(&mut leaves);
/// assert_eq!(leaves.0, 3);
/// ```
pub trait ExprVisitor {
    type Output;

    /// Visit a number literal
    fn visit_number(&mut self, n: f64) -> Self::Output;

    /// Visit a symbol/variable
    fn visit_symbol(&mut self, name: &str) -> Self::Output;

    /// Visit a unary operation (negation, factorial)
    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr) -> Self::Output;

    /// Visit a binary operation (+, -, *, /, ^, mod)
    fn visit_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Self::Output;

    /// Visit a function call
    fn visit_function(&mut self, name: &str, args: &[Expr]) -> Self::Output;
}

impl Expr {
    /// Dispatch this node to the matching visitor method
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) -> V::Output {
        match &self.kind {
            ExprKind::Number(n) => visitor.visit_number(*n),
            ExprKind::Symbol(s) => visitor.visit_symbol(s),
            ExprKind::Unary { op, operand } => visitor.visit_unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => visitor.visit_binary(*op, lhs, rhs),
            ExprKind::FunctionCall { name, args } => visitor.visit_function(name, args),
        }
    }
}

/// A visitor that collects all unique variable names
#[derive(Default)]
pub struct VariableCollector {
    pub variables: HashSet<String>,
}

impl ExprVisitor for VariableCollector {
    type Output = ();

    fn visit_number(&mut self, _n: f64) {}

    fn visit_symbol(&mut self, name: &str) {
        self.variables.insert(name.to_string());
    }

    fn visit_unary(&mut self, _op: UnaryOp, operand: &Expr) {
        operand.accept(self);
    }

    fn visit_binary(&mut self, _op: BinaryOp, lhs: &Expr, rhs: &Expr) {
        lhs.accept(self);
        rhs.accept(self);
    }

    fn visit_function(&mut self, _name: &str, args: &[Expr]) {
        for arg in args {
            arg.accept(self);
        }
    }
}
