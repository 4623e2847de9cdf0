use crate::ast::{BinaryOp, Expr, ExprKind};
use rustc_hash::FxHashMap;

/// Expression kind for fast rule filtering
/// Rules declare which expression kinds they can apply to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum NodeKind {
    Number,
    Symbol,
    Neg,
    Factorial,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Function,
}

impl NodeKind {
    /// Get the kind of an expression (cheap O(1) operation)
    #[inline]
    pub(crate) fn of(expr: &Expr) -> Self {
        match &expr.kind {
            ExprKind::Number(_) => NodeKind::Number,
            ExprKind::Symbol(_) => NodeKind::Symbol,
            ExprKind::Unary { op, .. } => match op {
                crate::ast::UnaryOp::Neg => NodeKind::Neg,
                crate::ast::UnaryOp::Factorial => NodeKind::Factorial,
            },
            ExprKind::Binary { op, .. } => match op {
                BinaryOp::Add => NodeKind::Add,
                BinaryOp::Sub => NodeKind::Sub,
                BinaryOp::Mul => NodeKind::Mul,
                BinaryOp::Div => NodeKind::Div,
                BinaryOp::Pow => NodeKind::Pow,
                BinaryOp::Mod => NodeKind::Mod,
            },
            ExprKind::FunctionCall { .. } => NodeKind::Function,
        }
    }
}

/// Core trait for all simplification rules
pub(crate) trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Higher priority rules run first on a node
    fn priority(&self) -> i32;

    /// Which expression kinds this rule can apply to.
    /// Rules will ONLY be checked against expressions matching these kinds.
    fn applies_to(&self) -> &'static [NodeKind];

    fn apply(&self, expr: &Expr) -> Option<Expr>;
}

/// Declare a unit-struct rule with its name, priority and node kinds
macro_rules! rule {
    ($ty:ident, $name:expr, $priority:expr, [$($kind:ident),+ $(,)?], |$e:ident| $body:block) => {
        pub(crate) struct $ty;

        impl $crate::simplification::rules::Rule for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn priority(&self) -> i32 {
                $priority
            }

            fn applies_to(&self) -> &'static [$crate::simplification::rules::NodeKind] {
                &[$($crate::simplification::rules::NodeKind::$kind),+]
            }

            fn apply(&self, $e: &$crate::ast::Expr) -> Option<$crate::ast::Expr> $body
        }
    };
}

/// Numeric simplification rules
pub(crate) mod numeric;

/// Algebraic simplification rules
pub(crate) mod algebraic;

/// Rule Registry for dependency ordering and lookup by node kind
pub(crate) struct RuleRegistry {
    rules_by_kind: FxHashMap<NodeKind, Vec<&'static dyn Rule>>,
}

impl RuleRegistry {
    pub(crate) fn new() -> Self {
        let mut rules: Vec<&'static dyn Rule> = Vec::new();
        rules.extend(numeric::get_numeric_rules());
        rules.extend(algebraic::get_algebraic_rules());

        // Sort by priority descending (higher priority runs first)
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority()));

        let mut rules_by_kind: FxHashMap<NodeKind, Vec<&'static dyn Rule>> =
            FxHashMap::default();
        for rule in rules {
            for &kind in rule.applies_to() {
                rules_by_kind.entry(kind).or_default().push(rule);
            }
        }
        RuleRegistry { rules_by_kind }
    }

    /// Get only rules that apply to a specific expression kind
    #[inline]
    pub(crate) fn get_rules_for_kind(&self, kind: NodeKind) -> &[&'static dyn Rule] {
        self.rules_by_kind
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

// ===== Shared pattern helpers =====

/// Both operands of a binary node, if it has the given operator
pub(crate) fn binary_parts(expr: &Expr, want: BinaryOp) -> Option<(&Expr, &Expr)> {
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } if *op == want => Some((&**lhs, &**rhs)),
        _ => None,
    }
}

/// Operand of a negation node
pub(crate) fn neg_operand(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Unary {
            op: crate::ast::UnaryOp::Neg,
            operand,
        } => Some(&**operand),
        _ => None,
    }
}
