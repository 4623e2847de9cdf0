//! Expression validator
//!
//! Cheap textual checks (parenthesis balance, operator runs, implicit
//! multiplication) followed by a full parse. Never fails: every problem is
//! reported inside the returned [`ValidationResult`].

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Two or more operator characters in a row
static CONSECUTIVE_OPERATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-*/^]{2,}").expect("valid regex"));

/// A digit immediately followed by a letter, as in `2x`
static DIGIT_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[a-zA-Z]").expect("valid regex"));

pub const CONSECUTIVE_OPERATORS_WARNING: &str = "Consecutive operators detected";
pub const IMPLICIT_MULTIPLICATION_WARNING: &str =
    "Implicit multiplication detected (e.g., \"2x\"). Consider using \"2*x\" for clarity.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check an expression for common mistakes and syntax errors
///
/// # Example
/// ```
/// use graphium::check_expression;
///
/// let report = check_expression("(2 + 3");
/// assert!(!report.valid);
/// assert_eq!(report.errors[0], "Unbalanced parentheses: missing 1 closing parenthesis(es)");
/// ```
pub fn check_expression(expression: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(err) = paren_balance_error(expression) {
        errors.push(err);
    }

    // Operator runs are a textual check: `2*-3` warns even though it is valid
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if CONSECUTIVE_OPERATORS.is_match(&compact) {
        warnings.push(CONSECUTIVE_OPERATORS_WARNING.to_string());
    }

    if has_implicit_multiplication(expression) {
        warnings.push(IMPLICIT_MULTIPLICATION_WARNING.to_string());
    }

    if let Err(err) = crate::parse(expression) {
        errors.push(err.to_string());
    }

    debug!(
        expression,
        errors = errors.len(),
        warnings = warnings.len(),
        "expression checked"
    );

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Scan left to right; stop at the first excess `)`
fn paren_balance_error(expression: &str) -> Option<String> {
    let mut depth: i64 = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Some("Unbalanced parentheses: extra closing parenthesis".to_string());
        }
    }
    (depth > 0).then(|| {
        format!(
            "Unbalanced parentheses: missing {} closing parenthesis(es)",
            depth
        )
    })
}

/// A digit-letter pair not directly opening a call, e.g. `2x` but not `2f(`
fn has_implicit_multiplication(expression: &str) -> bool {
    DIGIT_LETTER
        .find_iter(expression)
        .any(|m| !expression[m.end()..].starts_with('('))
}
