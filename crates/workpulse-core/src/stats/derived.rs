//! Per-record derived fields: range bands and the work-life balance score.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields::FieldNames;
use crate::record::{Record, Value};

/// Field name under which [`with_work_life_balance`] stores the score.
pub const WORK_LIFE_FIELD: &str = "work_life_balance_score";

/// A labelled half-open range `[previous upper, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: f64,
    pub label: String,
}

/// Ordered set of bands with a catch-all label above the last bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub bands: Vec<Band>,
    pub overflow: String,
}

impl Bands {
    /// Build from `(upper_exclusive, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is not finite or the bounds are not
    /// strictly increasing.
    pub fn new<I, S>(bands: I, overflow: impl Into<String>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        let bands = Self {
            bands: bands
                .into_iter()
                .map(|(upper, label)| Band {
                    upper,
                    label: label.into(),
                })
                .collect(),
            overflow: overflow.into(),
        };
        bands.validate()?;
        Ok(bands)
    }

    /// Check bounds are finite and strictly increasing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(b) = self.bands.iter().find(|b| !b.upper.is_finite()) {
            return Err(ValidationError::InvalidBands(format!(
                "bound for '{}' is not finite",
                b.label
            )));
        }
        if let Some(w) = self.bands.windows(2).find(|w| w[0].upper >= w[1].upper) {
            return Err(ValidationError::InvalidBands(format!(
                "'{}' ({}) must be below '{}' ({})",
                w[0].label, w[0].upper, w[1].label, w[1].upper
            )));
        }
        Ok(())
    }

    pub fn label_for(&self, v: f64) -> &str {
        self.bands
            .iter()
            .find(|b| v < b.upper)
            .map_or(self.overflow.as_str(), |b| b.label.as_str())
    }

    /// All labels in ascending order, overflow last.
    pub fn labels(&self) -> Vec<&str> {
        self.bands
            .iter()
            .map(|b| b.label.as_str())
            .chain(std::iter::once(self.overflow.as_str()))
            .collect()
    }

    pub fn age_groups() -> Self {
        Self::fixed(&[(25.0, "< 25"), (35.0, "25-34"), (45.0, "35-44"), (55.0, "45-54")], "55+")
    }

    pub fn salary_ranges() -> Self {
        Self::fixed(
            &[
                (50_000.0, "< $50K"),
                (75_000.0, "$50K-$75K"),
                (100_000.0, "$75K-$100K"),
                (150_000.0, "$100K-$150K"),
            ],
            "$150K+",
        )
    }

    pub fn price_categories() -> Self {
        Self::fixed(&[(20.0, "Budget"), (100.0, "Mid-Range")], "Premium")
    }

    fn fixed(bands: &[(f64, &str)], overflow: &str) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|(upper, label)| Band {
                    upper: *upper,
                    label: (*label).to_string(),
                })
                .collect(),
            overflow: overflow.to_string(),
        }
    }
}

/// Copies of `records` with `target` set to the band label of `source`.
///
/// Records whose `source` is not numeric are copied without `target`.
pub fn with_band(records: &[Record], source: &str, target: &str, bands: &Bands) -> Vec<Record> {
    records
        .iter()
        .map(|r| {
            let mut out = r.clone();
            if let Some(v) = r.number(source) {
                out.insert(target, bands.label_for(v));
            }
            out
        })
        .collect()
}

/// Work-life balance score of one record, 0-100.
///
/// Starts from 100 and deducts 2 per weekly hour above 45, 5 per exercise
/// hour below 3, 10 per sleep hour below 7 and 5 per stress point above 7.
/// Missing measures count as 0.
pub fn work_life_balance_score(record: &Record, fields: &FieldNames) -> f64 {
    let get = |f: &str| record.number(f).unwrap_or(0.0);
    let hours = get(&fields.weekly_hours);
    let exercise = get(&fields.exercise_hours);
    let sleep = get(&fields.sleep_hours);
    let stress = get(&fields.stress);

    let mut score = 100.0;
    if hours > 45.0 {
        score -= (hours - 45.0) * 2.0;
    }
    if exercise < 3.0 {
        score -= (3.0 - exercise) * 5.0;
    }
    if sleep < 7.0 {
        score -= (7.0 - sleep) * 10.0;
    }
    if stress > 7.0 {
        score -= (stress - 7.0) * 5.0;
    }
    score.clamp(0.0, 100.0)
}

/// Copies of `records` with [`WORK_LIFE_FIELD`] added.
pub fn with_work_life_balance(records: &[Record], fields: &FieldNames) -> Vec<Record> {
    records
        .iter()
        .map(|r| {
            let mut out = r.clone();
            out.insert(WORK_LIFE_FIELD, Value::Number(work_life_balance_score(r, fields)));
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_boundaries() {
        let bands = Bands::age_groups();
        assert_eq!(bands.label_for(24.9), "< 25");
        assert_eq!(bands.label_for(25.0), "25-34");
        assert_eq!(bands.label_for(54.0), "45-54");
        assert_eq!(bands.label_for(55.0), "55+");
    }

    #[test]
    fn test_salary_and_price_bands() {
        assert_eq!(Bands::salary_ranges().label_for(80_000.0), "$75K-$100K");
        assert_eq!(Bands::salary_ranges().label_for(150_000.0), "$150K+");
        assert_eq!(Bands::price_categories().label_for(19.99), "Budget");
        assert_eq!(Bands::price_categories().label_for(500.0), "Premium");
    }

    #[test]
    fn test_default_bands_are_valid() {
        for bands in [Bands::age_groups(), Bands::salary_ranges(), Bands::price_categories()] {
            assert!(bands.validate().is_ok());
        }
        assert_eq!(Bands::price_categories().labels(), vec!["Budget", "Mid-Range", "Premium"]);
    }

    #[test]
    fn test_new_rejects_unordered_bounds() {
        let err = Bands::new([(10.0, "low"), (5.0, "mid")], "high").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBands(_)));
        assert!(Bands::new([(f64::NAN, "low")], "high").is_err());
        assert!(Bands::new([(1.0, "low"), (2.0, "mid")], "high").is_ok());
    }

    #[test]
    fn test_with_band_skips_non_numeric() {
        let records = vec![
            Record::new().with("age", 30.0),
            Record::new().with("age", "unknown"),
        ];
        let out = with_band(&records, "age", "age_group", &Bands::age_groups());
        assert_eq!(out[0].get("age_group"), Some(&Value::from("25-34")));
        assert!(!out[1].contains("age_group"));
        // input untouched
        assert!(!records[0].contains("age_group"));
    }

    #[test]
    fn test_work_life_perfect_and_penalized() {
        let fields = FieldNames::default();
        let healthy = Record::new()
            .with("weekly_hours", 40.0)
            .with("exercise_hours", 4.0)
            .with("sleep_hours", 8.0)
            .with("stress_level", 5.0);
        assert_eq!(work_life_balance_score(&healthy, &fields), 100.0);

        let strained = Record::new()
            .with("weekly_hours", 50.0)
            .with("exercise_hours", 1.0)
            .with("sleep_hours", 6.0)
            .with("stress_level", 9.0);
        // 100 - 10 - 10 - 10 - 10
        assert_eq!(work_life_balance_score(&strained, &fields), 60.0);
    }

    #[test]
    fn test_work_life_clamped_at_zero() {
        let fields = FieldNames::default();
        // no data: exercise 0 (-15), sleep 0 (-70), then 80 hours (-70)
        let record = Record::new().with("weekly_hours", 80.0);
        assert_eq!(work_life_balance_score(&record, &fields), 0.0);

        let out = with_work_life_balance(&[record], &fields);
        assert_eq!(out[0].number(WORK_LIFE_FIELD), Some(0.0));
    }
}
