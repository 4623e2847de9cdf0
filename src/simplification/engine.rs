//! Core simplification engine with rule-based architecture
//!
//! Implements bottom-up tree traversal and rule application to a fixpoint,
//! bounded by an iteration cap and a depth limit.

use super::rules::{NodeKind, RuleRegistry};
use crate::ast::{Expr, ExprKind};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Global rule registry singleton - built once, reused across all simplifications
fn global_registry() -> &'static RuleRegistry {
    static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(RuleRegistry::new)
}

/// Main simplification engine
pub(crate) struct Simplifier {
    max_iterations: usize,
    max_depth: usize,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub(crate) fn new() -> Self {
        Self {
            max_iterations: 100,
            // Derivatives of the deepest parsable formula stay below this
            max_depth: 2 * crate::parser::MAX_DEPTH,
        }
    }

    /// Main simplification entry point
    pub(crate) fn simplify(&self, expr: Expr) -> Expr {
        let mut current = expr;

        for iteration in 0..self.max_iterations {
            let next = self.apply_rules_bottom_up(&current, 0);

            // Use structural equality to check if expression changed
            if next == current {
                return current;
            }
            trace!(iteration, %current, %next, "simplification pass");
            current = next;
        }

        debug!(
            max_iterations = self.max_iterations,
            "simplification stopped at iteration cap"
        );
        current
    }

    /// Apply rules bottom-up through the expression tree
    fn apply_rules_bottom_up(&self, expr: &Expr, depth: usize) -> Expr {
        if depth > self.max_depth {
            return expr.clone();
        }

        let rebuilt = match &expr.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => expr.clone(),
            ExprKind::Unary { op, operand } => {
                Expr::unary(*op, self.apply_rules_bottom_up(operand, depth + 1))
            }
            ExprKind::Binary { op, lhs, rhs } => Expr::binary(
                *op,
                self.apply_rules_bottom_up(lhs, depth + 1),
                self.apply_rules_bottom_up(rhs, depth + 1),
            ),
            ExprKind::FunctionCall { name, args } => Expr::func_multi(
                name.clone(),
                args.iter()
                    .map(|a| self.apply_rules_bottom_up(a, depth + 1))
                    .collect(),
            ),
        };

        self.apply_rules_to_node(rebuilt)
    }

    /// Apply all applicable rules to a single node in priority order
    fn apply_rules_to_node(&self, mut current: Expr) -> Expr {
        let kind = NodeKind::of(&current);
        for rule in global_registry().get_rules_for_kind(kind) {
            if let Some(new_expr) = rule.apply(&current) {
                trace!(rule = rule.name(), from = %current, to = %new_expr, "rule applied");
                current = new_expr;
            }
        }
        current
    }
}
