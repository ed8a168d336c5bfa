//! Employee metric bundles built on the aggregator.
//!
//! Department metrics carry a performance score combining satisfaction,
//! productivity and (inverted) stress; geographic metrics summarize pay
//! and satisfaction per zone and city.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::aggregate::{
    AggregateOp, AggregateResult, Aggregation, Aggregator, CompositeScore, Rescale, ScoreComponent,
};
use crate::fields::FieldNames;
use crate::record::Record;

/// Name of the composite added to each department.
pub const PERFORMANCE_SCORE: &str = "performance_score";

/// Weights and scales of the department performance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceWeights {
    pub satisfaction: f64,
    pub productivity: f64,
    pub stress: f64,
    /// Top of the satisfaction scale
    pub satisfaction_max: f64,
    /// Top of the stress scale
    pub stress_max: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            satisfaction: 1.0 / 3.0,
            productivity: 1.0 / 3.0,
            stress: 1.0 / 3.0,
            satisfaction_max: 10.0,
            stress_max: 10.0,
        }
    }
}

/// Per-zone and per-city summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographicMetrics {
    pub zones: IndexMap<String, AggregateResult>,
    pub cities: IndexMap<String, AggregateResult>,
}

/// Computes the employee metric bundles for a set of field names.
#[derive(Debug, Clone, Default)]
pub struct MetricsAnalyzer {
    pub fields: FieldNames,
    pub weights: PerformanceWeights,
    pub aggregator: Aggregator,
}

impl MetricsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(
        fields: FieldNames,
        weights: PerformanceWeights,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            fields,
            weights,
            aggregator,
        }
    }

    /// The performance composite over this analyzer's field names.
    pub fn performance_score(&self) -> CompositeScore {
        let f = &self.fields;
        let w = &self.weights;
        CompositeScore {
            name: PERFORMANCE_SCORE.to_string(),
            components: vec![
                ScoreComponent {
                    key: format!("{}_avg", f.satisfaction),
                    rescale: Rescale::Scale {
                        max: w.satisfaction_max,
                    },
                    weight: w.satisfaction,
                },
                ScoreComponent {
                    key: format!("{}_avg", f.productivity),
                    rescale: Rescale::Percent,
                    weight: w.productivity,
                },
                ScoreComponent {
                    key: format!("{}_avg", f.stress),
                    rescale: Rescale::Inverted { max: w.stress_max },
                    weight: w.stress,
                },
            ],
        }
    }

    /// Averages of salary, satisfaction, productivity, stress and
    /// experience per department, plus the performance score.
    pub fn department_metrics(&self, records: &[Record]) -> IndexMap<String, AggregateResult> {
        let f = &self.fields;
        let aggregations = averages(&[
            &f.salary,
            &f.satisfaction,
            &f.productivity,
            &f.stress,
            &f.experience,
        ]);
        let mut departments = self
            .aggregator
            .aggregate(records, &f.department, &aggregations);
        self.performance_score().apply(&mut departments);
        departments
    }

    /// Department with the highest and lowest performance score.
    ///
    /// Ties keep the first department encountered.
    pub fn best_and_worst<'a>(
        &self,
        departments: &'a IndexMap<String, AggregateResult>,
    ) -> Option<((&'a str, f64), (&'a str, f64))> {
        let mut scored = departments
            .iter()
            .map(|(k, v)| (k.as_str(), v.get(PERFORMANCE_SCORE).unwrap_or(0.0)));
        let first = scored.next()?;
        let (best, worst) = scored.fold((first, first), |(best, worst), cur| {
            (
                if cur.1 > best.1 { cur } else { best },
                if cur.1 < worst.1 { cur } else { worst },
            )
        });
        Some((best, worst))
    }

    /// Zone and city summaries.
    pub fn geographic_metrics(&self, records: &[Record]) -> GeographicMetrics {
        let f = &self.fields;
        GeographicMetrics {
            zones: self.aggregator.aggregate(
                records,
                &f.zone,
                &averages(&[&f.salary, &f.satisfaction, &f.productivity]),
            ),
            cities: self.aggregator.aggregate(
                records,
                &f.city,
                &averages(&[&f.salary, &f.satisfaction]),
            ),
        }
    }
}

fn averages(fields: &[&String]) -> Vec<Aggregation> {
    fields
        .iter()
        .map(|f| Aggregation::new(f.as_str(), AggregateOp::Avg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(dept: &str, zone: &str, sat: f64, prod: f64, stress: f64) -> Record {
        Record::new()
            .with("department", dept)
            .with("zone", zone)
            .with("city", "Lima")
            .with("salary", 60_000.0)
            .with("satisfaction", sat)
            .with("productivity", prod)
            .with("stress_level", stress)
            .with("experience_years", 5.0)
    }

    #[test]
    fn test_department_performance_score() {
        let records = vec![
            employee("Eng", "North", 8.0, 70.0, 4.0),
            employee("Eng", "North", 8.0, 70.0, 4.0),
            employee("Ops", "South", 5.0, 50.0, 8.0),
        ];
        let analyzer = MetricsAnalyzer::new();
        let depts = analyzer.department_metrics(&records);

        assert_eq!(depts["Eng"].count, 2);
        assert_eq!(depts["Eng"].get("salary_avg"), Some(60_000.0));
        // (80 + 70 + 60) / 3
        assert!((depts["Eng"].get(PERFORMANCE_SCORE).unwrap() - 70.0).abs() < 1e-9);
        // (50 + 50 + 20) / 3
        assert!((depts["Ops"].get(PERFORMANCE_SCORE).unwrap() - 40.0).abs() < 1e-9);

        let ((best, _), (worst, _)) = analyzer.best_and_worst(&depts).unwrap();
        assert_eq!(best, "Eng");
        assert_eq!(worst, "Ops");
    }

    #[test]
    fn test_best_and_worst_empty() {
        let analyzer = MetricsAnalyzer::new();
        assert!(analyzer.best_and_worst(&IndexMap::new()).is_none());
    }

    #[test]
    fn test_custom_weights() {
        let weights = PerformanceWeights {
            satisfaction: 1.0,
            productivity: 0.0,
            stress: 0.0,
            ..PerformanceWeights::default()
        };
        let analyzer =
            MetricsAnalyzer::with_settings(FieldNames::default(), weights, Aggregator::new());
        let depts = analyzer.department_metrics(&[employee("Eng", "N", 9.0, 10.0, 10.0)]);
        assert!((depts["Eng"].get(PERFORMANCE_SCORE).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_geographic_metrics() {
        let records = vec![
            employee("Eng", "North", 8.0, 70.0, 4.0),
            employee("Ops", "South", 6.0, 50.0, 8.0),
        ];
        let geo = MetricsAnalyzer::new().geographic_metrics(&records);
        assert_eq!(geo.zones.len(), 2);
        assert_eq!(geo.zones["North"].get("productivity_avg"), Some(70.0));
        assert_eq!(geo.cities["Lima"].count, 2);
        assert_eq!(geo.cities["Lima"].get("satisfaction_avg"), Some(7.0));
        assert!(geo.cities["Lima"].get("productivity_avg").is_none());
    }
}
