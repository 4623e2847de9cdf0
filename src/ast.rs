//! Abstract Syntax Tree for calculator formulas
//!
//! The node set is closed: constants, variables, unary operators, binary
//! operators and function calls. Everything else in the crate (evaluation,
//! differentiation, simplification, display) walks this tree.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// A node together with the size and height of the tree below it
///
/// Both are computed once when the node is built, so the parser can enforce
/// its limits without walking the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    nodes: usize,
    depth: usize,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

/// Prefix and postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation `-x`
    Neg,
    /// Postfix factorial `n!`
    Factorial,
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Floored modulo, written `%` or `mod`
    Mod,
}

impl BinaryOp {
    /// Operator symbol as written in a formula
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Mod => "mod",
        }
    }

    /// Binding power used by the parser and by display to decide on parentheses
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 10,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 20,
            BinaryOp::Pow => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// Variable or named constant (e.g., "x", "pi")
    Symbol(String),

    /// Unary operation
    Unary { op: UnaryOp, operand: Arc<Expr> },

    /// Binary operation
    Binary {
        op: BinaryOp,
        lhs: Arc<Expr>,
        rhs: Arc<Expr>,
    },

    /// Call of a registered function
    FunctionCall { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        let (nodes, depth) = match &kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => (1, 1),
            ExprKind::Unary { operand, .. } => (1 + operand.nodes, 1 + operand.depth),
            ExprKind::Binary { lhs, rhs, .. } => {
                (1 + lhs.nodes + rhs.nodes, 1 + lhs.depth.max(rhs.depth))
            }
            ExprKind::FunctionCall { args, .. } => (
                1 + args.iter().map(|a| a.nodes).sum::<usize>(),
                1 + args.iter().map(|a| a.depth).max().unwrap_or(0),
            ),
        };
        Expr { kind, nodes, depth }
    }

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Literal `0` exactly; a coefficient such as `1e-11` is not zero
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number() == Some(0.0)
    }

    /// Literal `1` exactly
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number() == Some(1.0)
    }

    // Convenience constructors

    /// Create a number expression
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// Create a symbol expression
    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::new(ExprKind::Symbol(s.into()))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::new(ExprKind::Unary {
            op,
            operand: Arc::new(operand),
        })
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::new(ExprKind::Binary {
            op,
            lhs: Arc::new(lhs),
            rhs: Arc::new(rhs),
        })
    }

    /// Create a negation expression
    pub fn neg(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Neg, operand)
    }

    /// Create an addition expression
    pub fn add_expr(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Add, lhs, rhs)
    }

    /// Create a subtraction expression
    pub fn sub_expr(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Sub, lhs, rhs)
    }

    /// Create a multiplication expression
    pub fn mul_expr(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Mul, lhs, rhs)
    }

    /// Create a division expression
    pub fn div_expr(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Div, lhs, rhs)
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::binary(BinaryOp::Pow, base, exponent)
    }

    /// Create a single-argument function call
    pub fn func(name: impl Into<String>, arg: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![arg],
        })
    }

    /// Create a multi-argument function call
    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    // Analysis methods

    /// Total number of nodes in the tree
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Length of the longest root-to-leaf path, counting both ends
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.depth
    }

    /// Check if the expression references a variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(s) => s == var,
            ExprKind::Unary { operand, .. } => operand.contains_var(var),
            ExprKind::Binary { lhs, rhs, .. } => lhs.contains_var(var) || rhs.contains_var(var),
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
        }
    }

    /// Collect every symbol name referenced by the expression
    pub fn variables(&self) -> HashSet<String> {
        let mut collector = crate::visitor::VariableCollector::default();
        self.accept(&mut collector);
        collector.variables
    }

    /// Replace every occurrence of `var` with `replacement`
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        match &self.kind {
            ExprKind::Number(_) => self.clone(),
            ExprKind::Symbol(s) if s == var => replacement.clone(),
            ExprKind::Symbol(_) => self.clone(),
            ExprKind::Unary { op, operand } => {
                Expr::unary(*op, operand.substitute(var, replacement))
            }
            ExprKind::Binary { op, lhs, rhs } => Expr::binary(
                *op,
                lhs.substitute(var, replacement),
                rhs.substitute(var, replacement),
            ),
            ExprKind::FunctionCall { name, args } => Expr::func_multi(
                name.clone(),
                args.iter()
                    .map(|a| a.substitute(var, replacement))
                    .collect(),
            ),
        }
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}
