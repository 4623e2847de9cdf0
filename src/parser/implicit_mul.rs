//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::error::Span;
use crate::parser::tokens::{Operator, Spanned, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Function name followed by ( is a call, never a product
        (Token::Function(_), _) => false,

        // Number/Identifier/)/! * function: 4 sin(x), x cos(x), (a) sin(x)
        (
            Token::Number(_)
            | Token::Identifier(_)
            | Token::RightParen
            | Token::Operator(Operator::Factorial),
            Token::Function(_),
        ) => true,

        // Number * Identifier: 2x
        // Number * (: 2(x)
        // Identifier * Identifier: a b
        // Identifier * (: x(y+1), x is not a function here
        // Identifier * Number: x 2
        // ) * Identifier / Number / (: (a)x, (a)2, (a)(b)
        // ! * Identifier / (: 3!x
        (
            Token::Number(_)
            | Token::Identifier(_)
            | Token::RightParen
            | Token::Operator(Operator::Factorial),
            Token::Identifier(_) | Token::LeftParen,
        )
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// The inserted `*` gets a zero-width span at the start of the following token
/// so later errors still point into the source text.
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Spanned>) -> Vec<Spanned> {
    if tokens.is_empty() {
        return tokens;
    }

    // Check if any insertion is needed before allocating new vector
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0].token, &w[1].token));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let mul_at = it
            .peek()
            .filter(|next| should_insert_mul(&current.token, &next.token))
            .map(|next| next.span.start);

        result.push(current);
        if let Some(pos) = mul_at {
            result.push(Spanned::new(
                Token::Operator(Operator::Mul),
                Span::new(pos, pos),
            ));
        }
    }

    result
}
