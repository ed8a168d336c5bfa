//! Record and field value types.
//!
//! A [`Record`] is an ordered mapping from field name to [`Value`]. Records
//! come either straight from an ingestion collaborator (all text) or out of
//! the normalizer (numeric fields coerced to [`Value::Number`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group key used for records that lack the grouping field.
pub const MISSING_KEY: &str = "undefined";

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value.
    ///
    /// Finite numbers are returned as-is; text is trimmed and parsed. NaN,
    /// infinities and unparseable text yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// True for empty or whitespace-only text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Ordered mapping of field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Numeric value of `field`, if present and numeric.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Stringified value of `field` for use as a group key.
    pub fn key(&self, field: &str) -> String {
        self.get(field)
            .map(Value::to_string)
            .unwrap_or_else(|| MISSING_KEY.to_string())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Extract the numeric values of `field`, skipping non-numeric entries.
pub fn numeric_values<'a, I>(records: I, field: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|r| r.number(field))
        .collect()
}

/// Numeric values of `field`, sorted ascending.
pub(crate) fn sorted_values<'a, I>(records: I, field: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut values = numeric_values(records, field);
    values.sort_by(f64::total_cmp);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_parses_as_number() {
        assert_eq!(Value::from(" 42.5 ").as_f64(), Some(42.5));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::from("").as_f64(), None);
    }

    #[test]
    fn test_non_finite_is_not_numeric() {
        assert_eq!(Value::Number(f64::NAN).as_f64(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_f64(), None);
        assert_eq!(Value::from("inf").as_f64(), None);
    }

    #[test]
    fn test_key_stringifies_numbers_and_missing() {
        let record = Record::new().with("zone", 10.0).with("dept", "Sales");
        assert_eq!(record.key("zone"), "10");
        assert_eq!(record.key("dept"), "Sales");
        assert_eq!(record.key("city"), MISSING_KEY);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = Record::new().with("a", 1.0).with("b", 2.0);
        record.insert("a", "x");
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::from("x")));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let record = Record::new().with("id", "7").with("salary", 5000.0);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"7","salary":5000.0}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_sorted_values_skips_non_numeric() {
        let records = vec![
            Record::new().with("x", 3.0),
            Record::new().with("x", "n/a"),
            Record::new().with("x", "1"),
            Record::new(),
        ];
        assert_eq!(sorted_values(&records, "x"), vec![1.0, 3.0]);
    }
}
