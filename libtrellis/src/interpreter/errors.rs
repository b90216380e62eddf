//! Errors raised while evaluating semantic expressions.
//!
//! An `EvalError` never escapes the interpreter: it becomes an ordinary match failure of the node
//! that evaluated the expression, with the error text as the failure message.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("a {0} value is not callable")]
    NotCallable(&'static str),
    #[error("attribute `.{0}` must be called")]
    BareAttribute(String),
    #[error("unsupported operand types for {op}: {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("{func}() takes {expected} argument(s), got {found}")]
    Arity {
        func: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("{func}() expects {expected}, got {found}")]
    BadArgument {
        func: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("cannot index a {0} value")]
    NotIndexable(&'static str),
    #[error("index must be an int, got {0}")]
    BadIndex(&'static str),
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("integer overflow")]
    Overflow,
    #[error("invalid {kind} `{text}`")]
    InvalidLiteral { kind: &'static str, text: String },
    #[error("invalid code point {0}")]
    InvalidCodePoint(i64),
    #[error("unknown Unicode general category `{0}`")]
    UnknownCategory(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
