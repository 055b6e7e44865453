//! Domain models for the csvjson conversion pipeline.
//!
//! - [`FieldValue`] - Typed cell value (string, number or boolean)
//! - [`Record`] - One data row keyed by column name, in header order
//! - [`Document`] - Header plus every record parsed from one input

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

// =============================================================================
// Field Value
// =============================================================================

/// Runtime type of a single cell, decided when the row is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text (quotes stripped).
    String(String),
    /// Integer or decimal.
    Number(serde_json::Number),
    /// `true` / `false`, any case.
    Boolean(bool),
}

impl FieldValue {
    /// Empty string, used to pad short rows.
    pub fn empty() -> Self {
        FieldValue::String(String::new())
    }

    pub fn is_empty_string(&self) -> bool {
        matches!(self, FieldValue::String(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match self {
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

// =============================================================================
// Record
// =============================================================================

/// One data row.
///
/// Column names are shared with the owning [`Document`]; a record always holds
/// exactly one value per column. There are no mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<FieldValue>,
}

impl Record {
    /// Build a record, right-padding with empty strings or dropping extra
    /// values so that it matches the column count.
    pub fn new(columns: Arc<[String]>, mut values: Vec<FieldValue>) -> Self {
        values.resize_with(columns.len(), FieldValue::empty);
        Self { columns, values }
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Document
// =============================================================================

/// Every record parsed from one input, plus its header.
///
/// Serializes as a JSON array of objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    headers: Arc<[String]>,
    records: Vec<Record>,
}

impl Document {
    pub fn new(headers: Arc<[String]>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_pads_short_rows() {
        let record = Record::new(columns(&["a", "b", "c"]), vec!["x".into(), "y".into()]);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("c"), Some(&FieldValue::empty()));
    }

    #[test]
    fn test_record_truncates_long_rows() {
        let record = Record::new(
            columns(&["a", "b"]),
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
        );
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("b"), Some(&FieldValue::from("2")));
    }

    #[test]
    fn test_record_key_order_follows_header() {
        let record = Record::new(
            columns(&["zeta", "alpha", "mid"]),
            vec![1i64.into(), true.into(), "x".into()],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":true,"mid":"x"}"#);
    }

    #[test]
    fn test_document_serializes_as_array() {
        let doc = Document::new(columns(&["id"]), vec![]);
        assert_eq!(serde_json::to_string(&doc).unwrap(), "[]");

        let cols = columns(&["id"]);
        let doc = Document::new(
            cols.clone(),
            vec![Record::new(cols.clone(), vec![1i64.into()]), Record::new(cols, vec![2i64.into()])],
        );
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"[{"id":1},{"id":2}]"#);
    }

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::from("a").as_str(), Some("a"));
        assert_eq!(FieldValue::from(false).as_bool(), Some(false));
        assert_eq!(FieldValue::from(7i64).as_number().and_then(|n| n.as_i64()), Some(7));
        assert!(FieldValue::empty().is_empty_string());
        assert!(!FieldValue::from(0i64).is_empty_string());
    }
}
