//! Human-readable insight summaries over employee records.

use serde::{Deserialize, Serialize};

use super::correlation::correlation;
use super::derived::work_life_balance_score;
use super::distribution::{percentiles, stats};
use super::metrics::MetricsAnalyzer;
use crate::record::Record;

/// Work-life scores below this are flagged.
pub const WORK_LIFE_TARGET: f64 = 70.0;

/// Correlations above this are reported as strong.
pub const STRONG_CORRELATION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Department,
    Salary,
    WorkLife,
    Correlation,
}

/// One headline finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    /// Headline figure, already formatted
    pub value: String,
}

/// Department, salary, work-life and correlation insights.
///
/// Insights that need data the records do not have are left out; the
/// correlation insight is always present.
pub fn generate_insights(analyzer: &MetricsAnalyzer, records: &[Record]) -> Vec<Insight> {
    let f = &analyzer.fields;
    let mut insights = Vec::new();

    let departments = analyzer.department_metrics(records);
    if let Some(((best, score), (worst, _))) = analyzer.best_and_worst(&departments) {
        insights.push(Insight {
            kind: InsightKind::Department,
            title: "Department Performance".into(),
            message: format!(
                "{best} has the highest performance score, while {worst} needs attention."
            ),
            value: format!("{score:.1}"),
        });
    }

    if let Some(salary) = stats(records, &f.salary) {
        let p25 = percentiles(records, &f.salary, &[25.0])
            .get("p25")
            .copied()
            .unwrap_or(0.0);
        insights.push(Insight {
            kind: InsightKind::Salary,
            title: "Salary Distribution".into(),
            message: format!(
                "Average salary is {}. 25% earn below {}.",
                format_currency(salary.mean),
                format_currency(p25)
            ),
            value: format_currency(salary.mean),
        });
    }

    if !records.is_empty() {
        let avg = records
            .iter()
            .map(|r| work_life_balance_score(r, f))
            .sum::<f64>()
            / records.len() as f64;
        let verdict = if avg < WORK_LIFE_TARGET {
            "Needs improvement."
        } else {
            "Good overall balance."
        };
        insights.push(Insight {
            kind: InsightKind::WorkLife,
            title: "Work-Life Balance".into(),
            message: format!("Average work-life balance score is {avg:.1}%. {verdict}"),
            value: format!("{avg:.1}%"),
        });
    }

    let r = correlation(records, &f.satisfaction, &f.productivity);
    let strength = if r > STRONG_CORRELATION {
        "Strong positive relationship."
    } else {
        "Weak relationship."
    };
    insights.push(Insight {
        kind: InsightKind::Correlation,
        title: "Satisfaction-Productivity Correlation".into(),
        message: format!("Correlation coefficient: {r:.2}. {strength}"),
        value: format!("{r:.2}"),
    });

    insights
}

/// Whole-unit currency with thousands separators, e.g. `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
