//! Common types and utilities for sltt commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use std::path::{Path, PathBuf};

use crate::error::{Result, SlttError};

// ============================================================================
// Emit Format
// ============================================================================

/// The stage a translation run should stop at, a CLI-facing mirror of
/// `sltc_drv::EmitStage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitFormat {
    /// Raw lexer token stream.
    Tokens,
    /// Parsed block tree, before translation.
    Blocks,
    /// Fully translated target-language source.
    Tl,
}

impl EmitFormat {
    /// Parse a string into an `EmitFormat`.
    ///
    /// # Arguments
    /// * `s` - The string to parse (case-insensitive)
    ///
    /// # Returns
    /// * `Option<EmitFormat>` - The parsed stage or None if invalid
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tokens" => Some(Self::Tokens),
            "blocks" => Some(Self::Blocks),
            "tl" => Some(Self::Tl),
            _ => None,
        }
    }

    /// The file extension a written-out file of this stage should carry.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Blocks => "blocks",
            Self::Tl => "tl",
        }
    }
}

impl From<EmitFormat> for sltc_drv::EmitStage {
    fn from(value: EmitFormat) -> Self {
        match value {
            EmitFormat::Tokens => sltc_drv::EmitStage::Tokens,
            EmitFormat::Blocks => sltc_drv::EmitStage::Blocks,
            EmitFormat::Tl => sltc_drv::EmitStage::Tl,
        }
    }
}

// ============================================================================
// Path Utilities
// ============================================================================

/// Sanitize a user-provided path to prevent path traversal attacks.
///
/// Ensures the resolved path is within the current working directory
/// or an allowed base directory.
///
/// # Arguments
/// * `path` - The user-provided path to sanitize
/// * `base_dir` - The allowed base directory (defaults to current dir)
///
/// # Returns
/// * `Result<PathBuf>` - The sanitized path or an error if traversal detected
///
/// # Security
/// This function protects against:
/// - Directory traversal using `..` components
/// - Symbolic link attacks
/// - Absolute path injection
#[allow(dead_code)]
pub fn sanitize_path(path: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(|| Path::new("."));
    let base_canonical = base
        .canonicalize()
        .map_err(|e| SlttError::Validation(format!("Invalid base directory: {}", e)))?;

    let path_canonical = path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, resolve relative to base
        base.join(path).to_path_buf()
    });

    // Ensure the path is within the base directory
    if !path_canonical.starts_with(&base_canonical) {
        return Err(SlttError::Validation(
            "Path traversal detected: path must be within current directory".to_string(),
        ));
    }

    Ok(path_canonical)
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
///
/// These constants provide consistent error messages across all commands.
pub mod error_messages {
    /// Error when no input files are specified.
    pub const NO_INPUT_FILES: &str = "No input files specified";

    /// Error when input path does not exist.
    pub const INPUT_PATH_NOT_EXIST: &str = "Input path does not exist: {}";

    /// Error when input path is not a file.
    pub const INPUT_PATH_NOT_FILE: &str = "Input path is not a file: {}";

    /// Error when input path is not a directory.
    pub const INPUT_PATH_NOT_DIR: &str = "Input path is not a directory: {}";

    /// Error when target path is not a directory.
    pub const TARGET_NOT_DIR: &str = "Target path is not a directory: {}";

    /// Error when directory is not empty.
    pub const DIR_NOT_EMPTY: &str = "Directory is not empty: {}";

    /// Error when output path is not a directory.
    pub const OUTPUT_PATH_NOT_DIR: &str = "Output path is not a directory: {}";

    /// Error when an unknown emit stage is specified.
    pub const UNKNOWN_FORMAT: &str = "Unknown emit stage: {}";

    /// Error when config has an invalid emit stage.
    pub const INVALID_CONFIG_FORMAT: &str = "Invalid emit stage in configuration: {}";

    /// Error when files failed to translate.
    pub const FILES_FAILED: &str = "{} file(s) failed to translate";

    /// Error when file path is invalid.
    pub const INVALID_FILE_PATH: &str = "Invalid file path";
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
///
/// These constants provide consistent output messages across all commands.
pub mod output_messages {
    /// Generic info message format.
    pub const INFO: &str = "info: {}";

    /// Generic warning message format.
    pub const WARNING: &str = "warning: {}";

    /// Generic error message format.
    pub const ERROR: &str = "error: {}";

    /// Message when a directory is created.
    pub const CREATED_DIR: &str = "created directory: {}";

    /// Message when a file is created.
    pub const CREATED_FILE: &str = "created file: {}";

    /// Message when an artifact is cleaned.
    pub const CLEANED_ARTIFACT: &str = "cleaned: {}";

    /// Message when processing a file.
    pub const PROCESSING_FILE: &str = "translating: {} -> {}";

    /// Message when a file is translated.
    pub const TRANSLATED_FILE: &str = "translated: {} -> {}";

    /// Message when a translation run is completed.
    pub const TRANSLATION_COMPLETED: &str = "translation completed in {:.2}s";

    /// Message showing files translated count.
    pub const FILES_TRANSLATED: &str = "files: {} translated, {} failed";
}
