//! Data quality checks run against a parsed [`Document`].
//!
//! Each rule lands in one of three lists:
//!
//! | Rule                            | On violation |
//! |---------------------------------|--------------|
//! | Columns match an ordered list   | failed       |
//! | Key column has no empty cells   | failed       |
//! | Key column values are unique    | failed       |
//! | Column values within a range    | warning      |
//! | Column holds the expected type  | warning      |
//!
//! # Example
//!
//! ```
//! use csvjson::{parse, quality::{check, QualityRules}};
//!
//! let doc = parse("id,name\n1,a\n1,b").unwrap();
//! let rules = QualityRules {
//!     key_column: Some("id".to_string()),
//!     ..QualityRules::default()
//! };
//!
//! let report = check(&doc, &rules);
//! assert!(!report.is_ok());
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{Document, FieldValue};
use crate::profile::{profile, ColumnKind};

/// Inclusive numeric bounds for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

/// Expected type of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRule {
    pub column: String,
    pub kind: ColumnKind,
}

/// Rules to check. Empty rules check nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityRules {
    /// Exact header, in order
    pub required_columns: Vec<String>,
    /// Column that must be filled and unique
    pub key_column: Option<String>,
    pub ranges: Vec<RangeRule>,
    pub types: Vec<TypeRule>,
}

impl QualityRules {
    /// Load rules from JSON.
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub warnings: Vec<String>,
}

impl QualityReport {
    /// True when no check failed. Warnings do not count.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every rule against the document.
pub fn check(document: &Document, rules: &QualityRules) -> QualityReport {
    log_info("🔍 Running data quality checks...");
    let stats = profile(document);
    let mut report = QualityReport::default();

    if !rules.required_columns.is_empty() {
        if document.headers() == rules.required_columns.as_slice() {
            report.passed.push("Required columns present".to_string());
        } else {
            report.failed.push(format!(
                "Columns do not match: expected [{}], found [{}]",
                rules.required_columns.join(", "),
                document.headers().join(", ")
            ));
        }
    }

    if let Some(key) = &rules.key_column {
        match column_index(document, key) {
            None => report.failed.push(format!("Key column '{}' not found", key)),
            Some(idx) => {
                let missing = stats.column_profiles[idx].missing;
                if missing == 0 {
                    report.passed.push(format!("No missing values in '{}'", key));
                } else {
                    report.failed.push(format!("{} missing values in '{}'", missing, key));
                }

                let duplicates = duplicate_values(document, idx);
                if duplicates == 0 {
                    report.passed.push(format!("No duplicate values in '{}'", key));
                } else {
                    report.failed.push(format!("{} duplicate values in '{}'", duplicates, key));
                }
            }
        }
    }

    for range in &rules.ranges {
        let Some(idx) = column_index(document, &range.column) else {
            report.warnings.push(format!("Range column '{}' not found", range.column));
            continue;
        };
        let outside = out_of_range(document, idx, range.min, range.max);
        if outside == 0 {
            report.passed.push(format!(
                "Values of '{}' within [{}, {}]",
                range.column, range.min, range.max
            ));
        } else {
            report.warnings.push(format!(
                "{} values of '{}' outside [{}, {}]",
                outside, range.column, range.min, range.max
            ));
        }
    }

    for rule in &rules.types {
        let Some(idx) = column_index(document, &rule.column) else {
            report.warnings.push(format!("Type column '{}' not found", rule.column));
            continue;
        };
        let actual = stats.column_profiles[idx].kind;
        if actual == rule.kind || actual == ColumnKind::Empty {
            report.passed.push(format!("'{}' has type {:?}", rule.column, rule.kind));
        } else {
            report.warnings.push(format!(
                "'{}' expected {:?}, found {:?}",
                rule.column, rule.kind, actual
            ));
        }
    }

    log_success(format!("Passed: {}", report.passed.len()));
    for failure in &report.failed {
        log_error(failure.as_str());
    }
    for warning in &report.warnings {
        log_warning(warning.as_str());
    }
    report
}

fn column_index(document: &Document, column: &str) -> Option<usize> {
    document.headers().iter().position(|h| h == column)
}

/// Non-empty values seen before in the same column.
fn duplicate_values(document: &Document, idx: usize) -> usize {
    let mut seen = HashSet::new();
    document
        .records()
        .iter()
        .map(|r| &r.values()[idx])
        .filter(|v| !v.is_empty_string())
        .filter(|v| !seen.insert(*v))
        .count()
}

/// Non-empty cells that are not numbers within `[min, max]`.
fn out_of_range(document: &Document, idx: usize, min: f64, max: f64) -> usize {
    document
        .records()
        .iter()
        .map(|r| &r.values()[idx])
        .filter(|v| !v.is_empty_string())
        .filter(|v| match v {
            FieldValue::Number(n) => n.as_f64().map_or(true, |x| x < min || x > max),
            _ => true,
        })
        .count()
}
