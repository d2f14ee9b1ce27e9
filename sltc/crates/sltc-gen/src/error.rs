//! Error type for statement/expression translation.

use thiserror::Error;

/// Raised when well-formed SL reaches the translator in a shape it cannot
/// lower — a malformed expression segment count, a reference to an
/// undeclared callable signature the by-ref mapper needed, or similar.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenError {
    #[error("malformed expression: {0} segments is not 1, 2, or 3")]
    MalformedExpression(usize),

    #[error("unsupported block kind for translation: {0}")]
    UnsupportedBlock(String),

    #[error("empty dotted call path")]
    EmptyCallPath,

    #[error(transparent)]
    Parse(#[from] sltc_par::ParseError),
}

pub type Result<T> = std::result::Result<T, GenError>;
