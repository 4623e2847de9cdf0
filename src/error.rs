use std::fmt;
use thiserror::Error;

/// Byte range of a token in the formula text, end exclusive
///
/// Prints 1-indexed for users; an empty span prints nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The single byte at `pos`
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos + 1)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            0 => Ok(()),
            1 => write!(f, " at position {}", self.start + 1),
            _ => write!(f, " at positions {}-{}", self.start + 1, self.end),
        }
    }
}

fn located(span: &Option<Span>) -> String {
    span.map(|s| s.to_string()).unwrap_or_default()
}

/// Errors raised while parsing, evaluating or running a numerical method
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    // Syntax errors
    #[error("Formula cannot be empty")]
    EmptyFormula,
    #[error("Invalid syntax: {msg}{}", located(.span))]
    InvalidSyntax { msg: String, span: Option<Span> },
    #[error("Invalid number format: '{value}'{}", located(.span))]
    InvalidNumber { value: String, span: Option<Span> },
    #[error("Invalid token: '{token}'{}", located(.span))]
    InvalidToken { token: String, span: Option<Span> },
    #[error("Expected '{expected}', but got '{got}'{}", located(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,
    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,

    // Evaluation errors
    #[error("Undefined symbol {0}")]
    UnknownVariable(String),
    #[error("Undefined function {0}")]
    UnknownFunction(String),
    #[error("Wrong number of arguments in function {name} ({got} provided, {expected} expected)")]
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    #[error("Domain error: {0}")]
    Domain(String),
    #[error("{0}")]
    NonFinite(String),

    // Numerical-method failures
    #[error("Derivative near zero at x = {x} - method failed")]
    DerivativeNearZero { x: f64 },
    #[error("Limit does not exist or is discontinuous")]
    LimitDoesNotExist,
    #[error("No feasible corner point satisfies the constraints")]
    Infeasible,
    #[error("Cannot solve linear system: matrix is singular")]
    SingularMatrix,
    #[error("Cannot differentiate {0} in closed form")]
    NotDifferentiable(String),

    // Input-shape errors
    #[error("Mismatched input lengths: x has {x_len} values, y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },
    #[error("Need at least {min} data points, got {got}")]
    TooFewPoints { got: usize, min: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Integer overflow computing {0}")]
    Overflow(String),

    // Units
    #[error("Unit \"{0}\" not found")]
    UnknownUnit(String),
    #[error("Units do not match: cannot convert {from} to {to}")]
    UnitMismatch { from: String, to: String },

    #[error("config error: {0}")]
    Config(String),
}

impl CalcError {
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        CalcError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Syntax error pointing at `span`
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        CalcError::Domain(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
