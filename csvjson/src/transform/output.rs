//! JSON rendering and output file writing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::models::Document;

/// Shape of the written JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON array of objects.
    #[default]
    Json,
    /// One compact object per line.
    JsonLines,
}

/// Serialize a document.
///
/// `pretty` applies to [`OutputFormat::Json`] only and uses 2-space
/// indentation. Key order always follows the header.
pub fn render(document: &Document, format: OutputFormat, pretty: bool) -> PipelineResult<String> {
    let content = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(document)?,
        OutputFormat::Json => serde_json::to_string(document)?,
        OutputFormat::JsonLines => {
            let mut out = String::new();
            for record in document.records() {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
            out
        }
    };
    Ok(content)
}

/// Write `content` to `path`, creating missing parent directories first.
///
/// An existing file is overwritten. A failed write may leave it truncated.
pub async fn write_output(path: &Path, content: &str) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PipelineError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })
}
