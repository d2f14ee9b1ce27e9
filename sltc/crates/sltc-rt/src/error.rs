//! Error type for the runtime operator façade.

use thiserror::Error;

/// A failure raised by one of the façade operators at translated-program
/// run time, as opposed to a translation-time [`sltc_gen::GenError`]. These
/// are ordinary `Result::Err` values the façade hands back to its caller —
/// only the error-trap protocol in [`crate::support`] ever catches one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("type mismatch")]
    TypeMismatch,

    #[error("overflow")]
    Overflow,

    #[error("invalid use of Null")]
    InvalidUseOfNull,

    #[error("division by zero")]
    DivisionByZero,

    #[error("object required")]
    ObjectRequired,

    #[error("comparison not supported between these operands")]
    UnsupportedComparison,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
