//! Driver-level error type, aggregating every phase's error into one enum
//! the binary layer can format and exit on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read {0}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Lex(#[from] sltc_lex::LexError),

    #[error(transparent)]
    Parse(#[from] sltc_par::ParseError),

    #[error(transparent)]
    Gen(#[from] sltc_gen::GenError),

    #[error("translation failed with {0} error(s)")]
    TranslationFailed(usize),

    #[error("{0} warning(s) treated as errors")]
    WarningsAsErrors(usize),

    #[error("no input files given")]
    NoInputFiles,
}
