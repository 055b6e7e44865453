//! Error types for the csvjson conversion pipeline.
//!
//! - [`CsvError`] - CSV parsing errors
//! - [`PipelineError`] - Top-level conversion errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Input has zero bytes.
    #[error("CSV input is empty")]
    EmptyInput,

    /// Input holds only blank lines.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A quoted field was never closed.
    #[error("Malformed CSV at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl CsvError {
    pub fn unterminated_quote(line: usize) -> Self {
        CsvError::Malformed {
            line,
            message: "quoted field is never closed".to_string(),
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert`].
/// It wraps parser errors and adds the filesystem failures of a conversion.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file is missing or unreadable.
    #[error("Cannot read '{}': {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output directory could not be created.
    #[error("Cannot create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("Cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory listing failed during validation.
    #[error("Cannot scan '{}': {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
