//! Per-group aggregation and composite scores.
//!
//! [`Aggregator`] groups records by a key field and reduces each requested
//! field with an [`AggregateOp`]. Results are keyed `"{field}_{op}"`, e.g.
//! `salary_avg`, next to the group's record count.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::grouping::group_by;
use crate::error::ValidationError;
use crate::record::Record;

/// Reduction applied to the numeric values of one field within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Avg,
    Sum,
    Min,
    Max,
}

impl AggregateOp {
    pub const ALL: [AggregateOp; 4] = [Self::Avg, Self::Sum, Self::Min, Self::Max];

    pub fn name(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Reduce `values`. Avg and sum of nothing are 0; min and max of
    /// nothing have no value.
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Avg if values.is_empty() => Some(0.0),
            Self::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
            Self::Sum => Some(values.iter().sum()),
            Self::Min => values.iter().copied().reduce(f64::min),
            Self::Max => values.iter().copied().reduce(f64::max),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateOp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "mean" => Ok(Self::Avg),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(ValidationError::UnknownOp(s.to_string())),
        }
    }
}

/// One `(field, op)` pair to compute per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub field: String,
    pub op: AggregateOp,
}

impl Aggregation {
    pub fn new(field: impl Into<String>, op: AggregateOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    /// Output key, `"{field}_{op}"`.
    pub fn key(&self) -> String {
        result_key(&self.field, self.op)
    }
}

impl FromStr for Aggregation {
    type Err = ValidationError;

    /// Parse `field:op`, e.g. `salary:avg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, op) = s
            .rsplit_once(':')
            .filter(|(field, _)| !field.trim().is_empty())
            .ok_or_else(|| ValidationError::InvalidAggregateSpec(s.to_string()))?;
        Ok(Self::new(field.trim(), op.parse()?))
    }
}

/// Key under which `(field, op)` is stored in an [`AggregateResult`].
pub fn result_key(field: &str, op: AggregateOp) -> String {
    format!("{field}_{op}")
}

/// Scalars computed for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Number of records in the group
    pub count: usize,
    /// Computed values keyed `"{field}_{op}"` and by composite score name
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl AggregateResult {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn value(&self, field: &str, op: AggregateOp) -> Option<f64> {
        self.get(&result_key(field, op))
    }
}

/// What min/max report for a group with no numeric values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyExtrema {
    /// Report 0, matching historical dashboard output
    #[default]
    Zero,
    /// Leave the key out of the result
    Omit,
}

/// Group-and-reduce engine.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    pub empty_extrema: EmptyExtrema,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_extrema(empty_extrema: EmptyExtrema) -> Self {
        Self { empty_extrema }
    }

    /// Aggregate `records` grouped by `key_field`.
    pub fn aggregate(
        &self,
        records: &[Record],
        key_field: &str,
        aggregations: &[Aggregation],
    ) -> IndexMap<String, AggregateResult> {
        group_by(records, key_field)
            .into_iter()
            .map(|(key, members)| {
                let mut result = AggregateResult {
                    count: members.len(),
                    values: IndexMap::new(),
                };

                for agg in aggregations {
                    let values: Vec<f64> = members
                        .iter()
                        .filter_map(|r| r.number(&agg.field))
                        .collect();
                    let reduced = match (agg.op.apply(&values), self.empty_extrema) {
                        (Some(v), _) => Some(v),
                        (None, EmptyExtrema::Zero) => Some(0.0),
                        (None, EmptyExtrema::Omit) => None,
                    };
                    if let Some(v) = reduced {
                        result.values.insert(agg.key(), v);
                    }
                }

                (key, result)
            })
            .collect()
    }
}

/// Aggregate with the default (zero-filling) policy.
pub fn aggregate(
    records: &[Record],
    key_field: &str,
    aggregations: &[Aggregation],
) -> IndexMap<String, AggregateResult> {
    Aggregator::new().aggregate(records, key_field, aggregations)
}

/// How a per-group average is mapped onto 0-100 before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rescale {
    /// Already a 0-100 value
    Percent,
    /// `v / max * 100`
    Scale { max: f64 },
    /// `(max - v) / max * 100`, higher input is worse
    Inverted { max: f64 },
}

impl Rescale {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Percent => v,
            Self::Scale { max } if max != 0.0 => v / max * 100.0,
            Self::Inverted { max } if max != 0.0 => (max - v) / max * 100.0,
            Self::Scale { .. } | Self::Inverted { .. } => 0.0,
        }
    }
}

/// One input to a [`CompositeScore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Aggregate key read from the group result, e.g. `satisfaction_avg`
    pub key: String,
    pub rescale: Rescale,
    pub weight: f64,
}

/// Weighted average of rescaled per-group aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub name: String,
    pub components: Vec<ScoreComponent>,
}

impl CompositeScore {
    /// Score for one group. A component whose key is absent counts as 0.
    pub fn score(&self, result: &AggregateResult) -> f64 {
        let total_weight: f64 = self.components.iter().map(|c| c.weight).sum();
        if total_weight == 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .components
            .iter()
            .map(|c| c.weight * c.rescale.apply(result.get(&c.key).unwrap_or(0.0)))
            .sum();
        weighted / total_weight
    }

    /// Add this score under `self.name` to every group.
    pub fn apply(&self, results: &mut IndexMap<String, AggregateResult>) {
        for result in results.values_mut() {
            let score = self.score(result);
            result.values.insert(self.name.clone(), score);
        }
    }

    /// The aggregations the components read, all as averages.
    pub fn required_aggregations(&self) -> Vec<Aggregation> {
        self.components
            .iter()
            .filter_map(|c| {
                c.key
                    .strip_suffix("_avg")
                    .map(|field| Aggregation::new(field, AggregateOp::Avg))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("d", "A").with("s", 10.0),
            Record::new().with("d", "A").with("s", 20.0),
            Record::new().with("d", "B").with("s", 5.0),
        ]
    }

    #[test]
    fn test_avg_per_group() {
        let out = aggregate(&records(), "d", &[Aggregation::new("s", AggregateOp::Avg)]);
        assert_eq!(out["A"].count, 2);
        assert_eq!(out["A"].get("s_avg"), Some(15.0));
        assert_eq!(out["B"].count, 1);
        assert_eq!(out["B"].get("s_avg"), Some(5.0));
    }

    #[test]
    fn test_result_serializes_flat() {
        let out = aggregate(&records(), "d", &[Aggregation::new("s", AggregateOp::Avg)]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"A": {"count": 2, "s_avg": 15.0}, "B": {"count": 1, "s_avg": 5.0}})
        );
    }

    #[test]
    fn test_all_ops() {
        let aggs: Vec<_> = AggregateOp::ALL
            .iter()
            .map(|op| Aggregation::new("s", *op))
            .collect();
        let out = aggregate(&records(), "d", &aggs);
        let a = &out["A"];
        assert_eq!(a.value("s", AggregateOp::Avg), Some(15.0));
        assert_eq!(a.value("s", AggregateOp::Sum), Some(30.0));
        assert_eq!(a.value("s", AggregateOp::Min), Some(10.0));
        assert_eq!(a.value("s", AggregateOp::Max), Some(20.0));
    }

    #[test]
    fn test_non_numeric_values_ignored() {
        let mut input = records();
        input.push(Record::new().with("d", "A").with("s", "oops"));
        let out = aggregate(&input, "d", &[Aggregation::new("s", AggregateOp::Avg)]);
        assert_eq!(out["A"].count, 3);
        assert_eq!(out["A"].get("s_avg"), Some(15.0));
    }

    #[test]
    fn test_empty_field_defaults_to_zero() {
        let aggs: Vec<_> = AggregateOp::ALL
            .iter()
            .map(|op| Aggregation::new("x", *op))
            .collect();
        let out = aggregate(&records(), "d", &aggs);
        for op in AggregateOp::ALL {
            assert_eq!(out["B"].value("x", op), Some(0.0));
        }
    }

    #[test]
    fn test_omit_policy_drops_empty_extrema_only() {
        let aggs: Vec<_> = AggregateOp::ALL
            .iter()
            .map(|op| Aggregation::new("x", *op))
            .collect();
        let out =
            Aggregator::with_empty_extrema(EmptyExtrema::Omit).aggregate(&records(), "d", &aggs);
        assert_eq!(out["B"].value("x", AggregateOp::Avg), Some(0.0));
        assert_eq!(out["B"].value("x", AggregateOp::Sum), Some(0.0));
        assert_eq!(out["B"].value("x", AggregateOp::Min), None);
        assert_eq!(out["B"].value("x", AggregateOp::Max), None);
    }

    #[test]
    fn test_parse_op_and_aggregation() {
        assert_eq!("AVG".parse::<AggregateOp>().unwrap(), AggregateOp::Avg);
        assert_eq!(
            "median".parse::<AggregateOp>(),
            Err(ValidationError::UnknownOp("median".into()))
        );
        assert_eq!(
            "salary:max".parse::<Aggregation>().unwrap(),
            Aggregation::new("salary", AggregateOp::Max)
        );
        assert!("salary".parse::<Aggregation>().is_err());
        assert!(":avg".parse::<Aggregation>().is_err());
    }

    #[test]
    fn test_composite_score_equal_weights() {
        let score = CompositeScore {
            name: "performance_score".into(),
            components: vec![
                ScoreComponent {
                    key: "sat_avg".into(),
                    rescale: Rescale::Scale { max: 10.0 },
                    weight: 1.0,
                },
                ScoreComponent {
                    key: "prod_avg".into(),
                    rescale: Rescale::Percent,
                    weight: 1.0,
                },
                ScoreComponent {
                    key: "stress_avg".into(),
                    rescale: Rescale::Inverted { max: 10.0 },
                    weight: 1.0,
                },
            ],
        };
        let mut result = AggregateResult::default();
        result.values.insert("sat_avg".into(), 8.0);
        result.values.insert("prod_avg".into(), 70.0);
        result.values.insert("stress_avg".into(), 4.0);

        // (80 + 70 + 60) / 3
        assert!((score.score(&result) - 70.0).abs() < 1e-9);
        assert_eq!(
            score.required_aggregations(),
            vec![
                Aggregation::new("sat", AggregateOp::Avg),
                Aggregation::new("prod", AggregateOp::Avg),
                Aggregation::new("stress", AggregateOp::Avg),
            ]
        );
    }

    #[test]
    fn test_composite_zero_weights() {
        let score = CompositeScore {
            name: "s".into(),
            components: vec![],
        };
        assert_eq!(score.score(&AggregateResult::default()), 0.0);
    }
}
