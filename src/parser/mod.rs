//! Parser module - converts strings to AST
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::{CalcError, Expr};

pub use pratt::MAX_DEPTH;

/// Maximum number of nodes a parsed formula may contain
pub const MAX_NODES: usize = 10_000;

/// Parse a formula string into an expression AST
///
/// Accepts the usual calculator syntax: `+ - * / ^`, `%` or `mod` for
/// floored modulo, postfix `!`, function calls like `log(x, 2)` and
/// implicit multiplication (`2x`, `3(x+1)`, `(a)(b)`).
///
/// # Example
/// ```
/// use graphium::parse;
///
/// let expr = parse("2x^2 + sin(x)").unwrap();
/// assert_eq!(expr.eval(&[("x", 0.0)]).unwrap(), 0.0);
/// ```
///
/// # Errors
/// Returns `CalcError` if:
/// - The input is empty
/// - The input contains invalid syntax or characters
/// - Parentheses are unbalanced
/// - The formula nests deeper than [`MAX_DEPTH`] or exceeds [`MAX_NODES`];
///   both are checked while the tree is built
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    // Pipeline: validate -> lex -> implicit_mul -> parse

    if input.trim().is_empty() {
        return Err(CalcError::EmptyFormula);
    }

    let tokens = lexer::lex(input)?;
    let tokens = implicit_mul::insert_implicit_multiplication(tokens);
    pratt::parse_expression(&tokens)
}
