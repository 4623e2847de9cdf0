//! Lexer: turns formula text into spanned tokens

use crate::error::{CalcError, Span};
use crate::functions::is_builtin;
use crate::parser::tokens::{Operator, Spanned, Token};
use std::iter::Peekable;
use std::str::CharIndices;

/// Tokenize the input string
pub(crate) fn lex(input: &str) -> Result<Vec<Spanned>, CalcError> {
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let (value, end) = lex_number(input, &mut chars)?;
            tokens.push(Spanned::new(Token::Number(value), Span::new(start, end)));
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &input[start..end];
            let token = if word == "mod" {
                Token::Operator(Operator::Mod)
            } else if is_builtin(word) {
                Token::Function(word.to_string())
            } else {
                Token::Identifier(word.to_string())
            };
            tokens.push(Spanned::new(token, Span::new(start, end)));
            continue;
        }

        let token = match ch {
            '+' => Token::Operator(Operator::Add),
            '-' => Token::Operator(Operator::Sub),
            '*' => Token::Operator(Operator::Mul),
            '/' => Token::Operator(Operator::Div),
            '%' => Token::Operator(Operator::Mod),
            '^' => Token::Operator(Operator::Pow),
            '!' => Token::Operator(Operator::Factorial),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            other => {
                return Err(CalcError::invalid_token_at(
                    other.to_string(),
                    Span::new(start, start + other.len_utf8()),
                ));
            }
        };
        chars.next();
        tokens.push(Spanned::new(token, Span::new(start, start + ch.len_utf8())));
    }

    Ok(tokens)
}

/// Lex a decimal literal with optional fraction and exponent.
/// Returns the value and the end byte offset.
fn lex_number(
    input: &str,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<(f64, usize), CalcError> {
    let start = chars.peek().map_or(input.len(), |&(i, _)| i);
    let mut end = start;
    let mut seen_dot = false;

    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() {
            end = i + 1;
            chars.next();
        } else if c == '.' {
            if seen_dot {
                // A second dot makes the literal malformed: swallow the rest of it
                end = i + 1;
                chars.next();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = j + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                return Err(CalcError::InvalidNumber {
                    value: input[start..end].to_string(),
                    span: Some(Span::new(start, end)),
                });
            }
            seen_dot = true;
            end = i + 1;
            chars.next();
        } else {
            break;
        }
    }

    // Exponent only when `e` is followed by digits (optionally signed);
    // otherwise `2e` is the number 2 times the constant e
    let rest = &input[end..];
    let mut exp_len = 0;
    if let Some(after_e) = rest.strip_prefix(['e', 'E']) {
        let unsigned = after_e.strip_prefix(['+', '-']).unwrap_or(after_e);
        let sign_len = after_e.len() - unsigned.len();
        let digits = unsigned.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            exp_len = 1 + sign_len + digits;
        }
    }
    if exp_len > 0 {
        let target = end + exp_len;
        while let Some(&(i, _)) = chars.peek() {
            if i >= target {
                break;
            }
            chars.next();
        }
        end = target;
    }

    let text = &input[start..end];
    text.parse::<f64>()
        .map(|v| (v, end))
        .map_err(|_| CalcError::InvalidNumber {
            value: text.to_string(),
            span: Some(Span::new(start, end)),
        })
}
