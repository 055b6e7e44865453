//! Pre-flight validation of every CSV file in a directory.
//!
//! Each `*.csv` file is read and parsed; the report lists the row count of
//! every file that parses and the error of every file that does not.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvjson::validate_dir;
//!
//! let summary = validate_dir("data/raw").await?;
//! if !summary.all_valid() {
//!     std::process::exit(1);
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_success};
use crate::parser::parse_bytes;

/// Directory validated when none is given.
pub const DEFAULT_DATA_DIR: &str = "data/raw";

/// Validation outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    /// Record count when the file parsed
    pub rows: Option<usize>,
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub files: Vec<FileReport>,
}

impl ValidationSummary {
    pub fn all_valid(&self) -> bool {
        self.files.iter().all(FileReport::is_valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_valid()).count()
    }
}

/// Validate every `*.csv` file directly inside `dir`, in file name order.
///
/// A missing directory has nothing to validate and yields an empty summary.
/// Any other failure to inspect `dir` is a [`PipelineError::Scan`].
pub async fn validate_dir(dir: impl AsRef<Path>) -> PipelineResult<ValidationSummary> {
    let dir = dir.as_ref();
    let scan_err = |source: std::io::Error| PipelineError::Scan {
        path: dir.to_path_buf(),
        source,
    };

    if !tokio::fs::try_exists(dir).await.map_err(scan_err)? {
        log_success(format!("No data directory at {}, skipping validation", dir.display()));
        return Ok(ValidationSummary::default());
    }

    let mut entries = tokio::fs::read_dir(dir).await.map_err(scan_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")) {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        log_success("No CSV files to validate");
        return Ok(ValidationSummary::default());
    }
    log_info(format!("📊 Validating {} CSV file(s)...", paths.len()));

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(validate_file(path).await);
    }
    Ok(ValidationSummary { files })
}

async fn validate_file(path: PathBuf) -> FileReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let outcome = match tokio::fs::read(&path).await {
        Ok(bytes) => parse_bytes(&bytes)
            .map(|parsed| parsed.document.len())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(rows) => {
            log_success(format!("{}: {} rows", name, rows));
            FileReport {
                file: path,
                rows: Some(rows),
                error: None,
            }
        }
        Err(error) => {
            log_error(format!("{}: INVALID - {}", name, error));
            FileReport {
                file: path,
                rows: None,
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let summary = validate_dir(dir.path().join("absent")).await.unwrap();
        assert!(summary.files.is_empty());
        assert!(summary.all_valid());
    }

    #[tokio::test]
    async fn test_reports_each_csv_in_name_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "a,b\n1,2\n3,4\n").unwrap();
        std::fs::write(dir.path().join("a.csv"), "x\n1\n").unwrap();
        std::fs::write(dir.path().join("c.CSV"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let summary = validate_dir(dir.path()).await.unwrap();

        let names: Vec<_> = summary
            .files
            .iter()
            .map(|f| f.file.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.CSV"]);
        assert_eq!(summary.files[0].rows, Some(1));
        assert_eq!(summary.files[1].rows, Some(2));
        assert!(summary.files[2].error.as_deref().unwrap().contains("empty"));
        assert_eq!(summary.invalid_count(), 1);
        assert!(!summary.all_valid());
    }

    #[tokio::test]
    async fn test_uninspectable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        // Looking up a child of a regular file fails with something other than NotFound
        let err = validate_dir(file.join("raw")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Scan { .. }));
    }

    #[tokio::test]
    async fn test_directory_without_csv_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), "# data").unwrap();

        let summary = validate_dir(dir.path()).await.unwrap();
        assert!(summary.files.is_empty());
    }
}
