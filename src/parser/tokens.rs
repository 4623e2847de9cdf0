use crate::ast::BinaryOp;
use crate::error::Span;

/// Operator tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    /// Postfix `!`
    Factorial,
}

impl Operator {
    /// Binding power for infix and postfix use
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Operator::Factorial => 40,
            _ => self.as_binary().map_or(0, |op| op.precedence()),
        }
    }

    pub(crate) fn as_binary(&self) -> Option<BinaryOp> {
        match self {
            Operator::Add => Some(BinaryOp::Add),
            Operator::Sub => Some(BinaryOp::Sub),
            Operator::Mul => Some(BinaryOp::Mul),
            Operator::Div => Some(BinaryOp::Div),
            Operator::Mod => Some(BinaryOp::Mod),
            Operator::Pow => Some(BinaryOp::Pow),
            Operator::Factorial => None,
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Operator::Factorial => "!",
            Operator::Mod => "mod",
            _ => self.as_binary().map_or("?", |op| op.symbol()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    /// Name of a registered function; must be followed by `(`
    Function(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Text shown to users in error messages
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Identifier(s) | Token::Function(s) => s.clone(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// A token plus where it came from in the source text
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub span: Span,
}

impl Spanned {
    pub(crate) fn new(token: Token, span: Span) -> Self {
        Spanned { token, span }
    }
}
