//! High-level conversion API: CSV file in, JSON file out.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvjson::convert;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = convert(
//!         Path::new("data/raw/input.csv"),
//!         Path::new("data/output/result.json"),
//!     ).await?;
//!
//!     println!("Converted {} rows", rows);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::output::{render, write_output, OutputFormat};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::parser::{parse_bytes, ParsedInput};
use crate::profile::{profile, Profile};

/// Input path used when none is given.
pub const DEFAULT_INPUT: &str = "data/raw/input.csv";

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "data/output/result.json";

/// Options for one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// CSV file to read
    pub input: PathBuf,

    /// JSON file to write (parent directories are created)
    pub output: PathBuf,

    pub format: OutputFormat,

    /// Indent array output
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertReport {
    /// Records written
    pub rows: usize,
    pub headers: Vec<String>,
    pub encoding: String,
    pub output: PathBuf,
    pub bytes_written: usize,
    pub profile: Profile,
}

/// Convert `input` to a pretty JSON array at `output`.
///
/// Returns the number of records written.
pub async fn convert(input: &Path, output: &Path) -> PipelineResult<usize> {
    let options = ConvertOptions {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        ..ConvertOptions::default()
    };
    Ok(convert_with(&options).await?.rows)
}

/// Read and parse a whole CSV file.
pub async fn read_input(path: &Path) -> PipelineResult<ParsedInput> {
    log_info(format!("📖 Reading CSV: {}", path.display()));
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PipelineError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    let parsed = parse_bytes(&bytes)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!(
        "Loaded {} rows, {} columns",
        parsed.document.len(),
        parsed.document.headers().len()
    ));
    Ok(parsed)
}

/// Run a conversion with explicit options.
///
/// 1. Reads the whole input file
/// 2. Decodes and parses it
/// 3. Serializes the records
/// 4. Creates the output directory and writes the file
///
/// Nothing is written if reading or parsing fails.
pub async fn convert_with(options: &ConvertOptions) -> PipelineResult<ConvertReport> {
    let parsed = read_input(&options.input).await?;
    let document = parsed.document;

    let profile = profile(&document);
    if profile.duplicates > 0 {
        log_warning(format!("{} duplicate rows", profile.duplicates));
    }

    let content = render(&document, options.format, options.pretty)?;
    write_output(&options.output, &content).await?;

    log_success(format!("Converted {} rows", document.len()));
    log_info_indent(format!("Output: {}", options.output.display()), 1);

    Ok(ConvertReport {
        rows: document.len(),
        headers: document.headers().to_vec(),
        encoding: parsed.encoding,
        output: options.output.clone(),
        bytes_written: content.len(),
        profile,
    })
}
