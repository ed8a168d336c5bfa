//! Record normalization.
//!
//! Raw rows arrive with every field as text. Normalization checks the
//! identifying fields, coerces numeric fields to [`Value::Number`] and drops
//! rows that cannot be analyzed. Dropped rows are reported back, never raised.

use serde::{Deserialize, Serialize};

use crate::fields::FieldNames;
use crate::record::{Record, Value};

/// Field requirements applied by [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeRules {
    /// Fields that must be present and non-blank (id, grouping category)
    pub required_text: Vec<String>,
    /// Fields that must be present and numeric
    pub required_numeric: Vec<String>,
    /// Fields coerced to numbers, defaulting to 0 when unparseable
    pub optional_numeric: Vec<String>,
    /// Fields that must be numeric and strictly greater than 0
    pub required_positive: Vec<String>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self::for_fields(&FieldNames::default())
    }
}

impl NormalizeRules {
    /// Employee-dataset rules for the given logical field names.
    pub fn for_fields(fields: &FieldNames) -> Self {
        Self {
            required_text: vec![fields.id.clone(), fields.department.clone()],
            required_numeric: vec![fields.salary.clone(), fields.satisfaction.clone()],
            optional_numeric: fields.optional_measures(),
            required_positive: Vec::new(),
        }
    }

    /// Product-catalog rules: a category and positive rating, rating count,
    /// price and discount.
    pub fn products() -> Self {
        Self {
            required_text: vec!["main_category".into()],
            required_positive: vec![
                "rating".into(),
                "rating_count".into(),
                "actual_price".into(),
                "discount_percentage".into(),
            ],
            ..Self::permissive()
        }
    }

    /// Rules that accept every record unchanged.
    pub fn permissive() -> Self {
        Self {
            required_text: Vec::new(),
            required_numeric: Vec::new(),
            optional_numeric: Vec::new(),
            required_positive: Vec::new(),
        }
    }
}

/// Why a record was excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "field", rename_all = "snake_case")]
pub enum RejectReason {
    /// Required identifying/category field missing or blank
    MissingField(String),
    /// Required numeric field missing or not a number
    NotNumeric(String),
    /// Field that must be positive is missing, not a number, or <= 0
    NotPositive(String),
}

/// A record dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Position of the record in the input
    pub index: usize,
    pub reason: RejectReason,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    /// Kept records, in input order
    pub records: Vec<Record>,
    /// Excluded records and why
    pub rejected: Vec<Rejection>,
}

/// Validate and coerce `raw` according to `rules`.
pub fn normalize(raw: &[Record], rules: &NormalizeRules) -> Normalized {
    let mut out = Normalized::default();

    for (index, row) in raw.iter().enumerate() {
        match normalize_one(row, rules) {
            Ok(record) => out.records.push(record),
            Err(reason) => out.rejected.push(Rejection { index, reason }),
        }
    }

    if !out.rejected.is_empty() {
        tracing::debug!(
            kept = out.records.len(),
            rejected = out.rejected.len(),
            "normalization excluded records"
        );
    }
    out
}

fn normalize_one(row: &Record, rules: &NormalizeRules) -> Result<Record, RejectReason> {
    for field in &rules.required_text {
        match row.get(field) {
            Some(v) if !v.is_blank() => {}
            _ => return Err(RejectReason::MissingField(field.clone())),
        }
    }

    let mut record = row.clone();

    for field in &rules.required_numeric {
        let n = row
            .number(field)
            .ok_or_else(|| RejectReason::NotNumeric(field.clone()))?;
        record.insert(field.as_str(), Value::Number(n));
    }

    for field in &rules.required_positive {
        let n = row
            .number(field)
            .filter(|n| *n > 0.0)
            .ok_or_else(|| RejectReason::NotPositive(field.clone()))?;
        record.insert(field.as_str(), Value::Number(n));
    }

    for field in &rules.optional_numeric {
        let n = row.number(field).unwrap_or(0.0);
        record.insert(field.as_str(), Value::Number(n));
    }

    Ok(record)
}
