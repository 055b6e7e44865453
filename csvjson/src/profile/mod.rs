//! Quick data profiling for a parsed [`Document`].
//!
//! Reports row and column counts, duplicate rows, and per column the number
//! of missing (empty) cells and the type the cells were coerced to.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Document, FieldValue};

/// Dominant type of a column's non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every cell is empty.
    Empty,
    Number,
    Boolean,
    String,
    /// Non-empty cells of more than one type.
    Mixed,
}

impl ColumnKind {
    fn of(value: &FieldValue) -> Self {
        match value {
            FieldValue::Number(_) => ColumnKind::Number,
            FieldValue::Boolean(_) => ColumnKind::Boolean,
            FieldValue::String(_) => ColumnKind::String,
        }
    }

    fn merge(self, other: ColumnKind) -> Self {
        match (self, other) {
            (ColumnKind::Empty, k) | (k, ColumnKind::Empty) => k,
            (a, b) if a == b => a,
            _ => ColumnKind::Mixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Cells holding the empty string
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub rows: usize,
    pub columns: usize,
    /// Rows identical to an earlier row
    pub duplicates: usize,
    pub column_profiles: Vec<ColumnProfile>,
}

impl Profile {
    pub fn missing_total(&self) -> usize {
        self.column_profiles.iter().map(|c| c.missing).sum()
    }
}

/// Profile a document in a single pass over its records.
pub fn profile(document: &Document) -> Profile {
    let mut column_profiles: Vec<ColumnProfile> = document
        .headers()
        .iter()
        .map(|name| ColumnProfile {
            name: name.clone(),
            kind: ColumnKind::Empty,
            missing: 0,
        })
        .collect();

    let mut seen = HashSet::new();
    let mut duplicates = 0;

    for record in document.records() {
        if !seen.insert(record.values()) {
            duplicates += 1;
        }
        for (column, value) in column_profiles.iter_mut().zip(record.values()) {
            if value.is_empty_string() {
                column.missing += 1;
            } else {
                column.kind = column.kind.merge(ColumnKind::of(value));
            }
        }
    }

    Profile {
        rows: document.len(),
        columns: document.headers().len(),
        duplicates,
        column_profiles,
    }
}
