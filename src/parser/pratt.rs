use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{CalcError, Span};
use crate::parser::MAX_NODES;
use crate::parser::tokens::{Operator, Spanned, Token};

/// Maximum nesting accepted by the parser, both for parentheses and for the
/// height of the resulting tree (a sum of n terms is n levels deep)
pub const MAX_DEPTH: usize = 500;

/// Unary minus/plus bind between `*` (20) and `^` (30), so `-x^2` is `-(x^2)`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Spanned]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    let expr = parser.parse_expr(0)?;

    // Everything must be consumed, e.g. `2 3` or a stray `)`
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(CalcError::UnexpectedToken {
            expected: "operator or end of input".to_string(),
            got: extra.token.to_user_string(),
            span: Some(extra.span),
        });
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, expected: &str) -> CalcError {
        match self.current() {
            Some(t) => CalcError::UnexpectedToken {
                expected: expected.to_string(),
                got: t.token.to_user_string(),
                span: Some(t.span),
            },
            None => CalcError::UnexpectedToken {
                expected: expected.to_string(),
                got: "end of input".to_string(),
                span: self.tokens.last().map(|t| Span::at(t.span.end)),
            },
        }
    }

    /// Reject a node as soon as the tree it completes is too large
    fn within_limits(&self, expr: Expr) -> Result<Expr, CalcError> {
        if expr.node_count() > MAX_NODES {
            Err(CalcError::MaxNodesExceeded)
        } else if expr.max_depth() > MAX_DEPTH {
            Err(CalcError::MaxDepthExceeded)
        } else {
            Ok(expr)
        }
    }

    fn expect_right_paren(&mut self) -> Result<(), CalcError> {
        match self.current() {
            Some(Spanned {
                token: Token::RightParen,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(")")),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix / postfix)
        while let Some(Spanned {
            token: Token::Operator(op),
            ..
        }) = self.current()
        {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.advance();
            left = match op.as_binary() {
                Some(bin) => {
                    // Right associative for power, left for others
                    let next_precedence = if bin == BinaryOp::Pow {
                        precedence
                    } else {
                        precedence + 1
                    };
                    let right = self.parse_expr(next_precedence)?;
                    self.within_limits(Expr::binary(bin, left, right))?
                }
                None => self.within_limits(Expr::unary(UnaryOp::Factorial, left))?,
            };
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, CalcError> {
        let mut args = Vec::new();

        if let Some(Spanned {
            token: Token::RightParen,
            ..
        }) = self.current()
        {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current().map(|t| &t.token) {
                Some(Token::Comma) => self.advance(),
                Some(Token::RightParen) => break,
                _ => return Err(self.unexpected(", or )")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, CalcError> {
        let spanned = self.current().ok_or(CalcError::UnexpectedEndOfInput)?;

        match &spanned.token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name.clone()))
            }

            Token::Function(name) => {
                self.advance();

                // Function must be followed by (
                match self.current() {
                    Some(Spanned {
                        token: Token::LeftParen,
                        ..
                    }) => {
                        self.advance(); // consume (
                        let args = self.parse_arguments()?;
                        self.expect_right_paren()?;
                        self.within_limits(Expr::func_multi(name.clone(), args))
                    }
                    _ => Err(self.unexpected("(")),
                }
            }

            Token::Operator(Operator::Sub) => {
                self.advance();
                let operand = self.parse_expr(UNARY_PRECEDENCE)?;
                match operand.as_number() {
                    Some(n) => Ok(Expr::number(-n)),
                    None => self.within_limits(Expr::neg(operand)),
                }
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            _ => Err(self.unexpected("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    fn toks(tokens: Vec<Token>) -> Vec<Spanned> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Spanned::new(t, Span::at(i)))
            .collect()
    }

    #[test]
    fn test_parse_number() {
        let ast = parse_expression(&toks(vec![Token::Number(314.0 / 100.0)])).unwrap();
        assert_eq!(ast, Expr::number(314.0 / 100.0));
    }

    #[test]
    fn test_precedence() {
        // x + 2 * 3 should be x + (2 * 3)
        let ast = parse_expression(&toks(vec![
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
            Token::Operator(Operator::Mul),
            Token::Number(3.0),
        ]))
        .unwrap();

        match &ast.kind {
            ExprKind::Binary {
                op: BinaryOp::Add,
                lhs,
                rhs,
            } => {
                assert!(matches!(lhs.kind, ExprKind::Symbol(_)));
                assert!(matches!(
                    rhs.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            _ => panic!("Expected Add at top level"),
        }
    }

    #[test]
    fn test_power_right_associative() {
        // 2^3^2 = 2^(3^2)
        let ast = parse_expression(&toks(vec![
            Token::Number(2.0),
            Token::Operator(Operator::Pow),
            Token::Number(3.0),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ]))
        .unwrap();
        let expected = Expr::pow(
            Expr::number(2.0),
            Expr::pow(Expr::number(3.0), Expr::number(2.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_unary_minus_below_power() {
        // -x^2 = -(x^2)
        let ast = parse_expression(&toks(vec![
            Token::Operator(Operator::Sub),
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ]))
        .unwrap();
        assert_eq!(
            ast,
            Expr::neg(Expr::pow(Expr::symbol("x"), Expr::number(2.0)))
        );
    }

    #[test]
    fn test_factorial_binds_tighter_than_power() {
        let ast = parse_expression(&toks(vec![
            Token::Number(2.0),
            Token::Operator(Operator::Pow),
            Token::Number(3.0),
            Token::Operator(Operator::Factorial),
        ]))
        .unwrap();
        assert_eq!(
            ast,
            Expr::pow(
                Expr::number(2.0),
                Expr::unary(UnaryOp::Factorial, Expr::number(3.0))
            )
        );
    }

    #[test]
    fn test_empty_parentheses() {
        let result = parse_expression(&toks(vec![Token::LeftParen, Token::RightParen]));
        assert!(result.is_err(), "got {:?}", result);
    }

    #[test]
    fn test_missing_right_paren() {
        let err = parse_expression(&toks(vec![
            Token::LeftParen,
            Token::Number(1.0),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            CalcError::UnexpectedToken { ref expected, .. } if expected == ")"
        ));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_expression(&toks(vec![Token::Number(2.0), Token::Number(3.0)]))
            .unwrap_err();
        assert!(matches!(err, CalcError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut tokens = vec![Token::LeftParen; MAX_DEPTH + 1];
        tokens.push(Token::Number(1.0));
        tokens.extend(vec![Token::RightParen; MAX_DEPTH + 1]);
        assert_eq!(
            parse_expression(&toks(tokens)),
            Err(CalcError::MaxDepthExceeded)
        );
    }
}
