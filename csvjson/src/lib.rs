//! # csvjson - CSV to JSON conversion
//!
//! Reads a CSV file, turns every row into a JSON object keyed by the header
//! and writes the array to an output file, creating its directory if needed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Document   │────▶│  JSON File  │
//! │   (UTF-8)   │     │ (RFC 4180)  │     │ (typed rows)│     │  (pretty)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvjson::convert;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let rows = convert(Path::new("input.csv"), Path::new("out/result.json")).await.unwrap();
//!     println!("Converted {} rows", rows);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Field values, records and documents
//! - [`parser`] - CSV parsing and type coercion
//! - [`transform`] - Rendering and the conversion pipeline
//! - [`profile`] - Row/column statistics
//! - [`validation`] - Directory-wide CSV checks
//! - [`quality`] - Column, key, range and type checks
//! - [`logs`] - Progress log broadcasting

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Conversion
pub mod transform;

// Reporting
pub mod profile;
pub mod validation;
pub mod quality;

pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CsvError, CsvResult, PipelineError, PipelineResult};

pub use models::{Document, FieldValue, Record};

pub use parser::{
    coerce,
    coerce_str,
    decode_bytes,
    detect_encoding,
    parse,
    parse_bytes,
    split_cells,
    split_logical_lines,
    Cell,
    LogicalLine,
    ParsedInput,
};

pub use transform::{
    convert,
    convert_with,
    read_input,
    render,
    write_output,
    ConvertOptions,
    ConvertReport,
    OutputFormat,
    DEFAULT_INPUT,
    DEFAULT_OUTPUT,
};

pub use profile::{profile, ColumnKind, ColumnProfile, Profile};

pub use validation::{validate_dir, FileReport, ValidationSummary, DEFAULT_DATA_DIR};

pub use quality::{check, QualityReport, QualityRules, RangeRule, TypeRule};

pub use logs::{LogEntry, LogLevel, LOG_BROADCASTER};
