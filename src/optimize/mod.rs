//! Optimisation routines
//!
//! - [`gradient`]: fixed-budget gradient descent in two variables
//! - [`linprog`]: two-variable linear programs by corner enumeration
//!
//! Single-variable extremum search lives in [`crate::calculus`].

pub mod gradient;
pub mod linprog;

pub use gradient::{DescentResult, DescentStep, gradient_descent, minimize};
pub use linprog::{
    ConstraintParseError, Corner, LinearConstraint, LpSolution, Relation, parse_constraints,
};
