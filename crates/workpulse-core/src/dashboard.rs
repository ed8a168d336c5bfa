//! Dashboard state and summary.
//!
//! [`DashboardState`] is an immutable value: the loaded records plus the
//! active category filter. Changing the filter yields a new state sharing
//! the same records. [`summarize`] turns a state into everything a view
//! needs to draw, without touching any rendering API.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::record::Record;
use crate::stats::{
    correlation, count_by, generate_insights, histogram, outliers, percentiles, regression,
    stats, AggregateResult, Bin, DistributionStats, Insight, MetricsAnalyzer, RegressionLine,
    DEFAULT_PERCENTILES,
};

/// Records plus the active category filter.
#[derive(Debug, Clone)]
pub struct DashboardState {
    records: Arc<[Record]>,
    category_field: String,
    filter: Option<String>,
}

impl DashboardState {
    pub fn new(records: Vec<Record>, category_field: impl Into<String>) -> Self {
        Self {
            records: records.into(),
            category_field: category_field.into(),
            filter: None,
        }
    }

    /// Same records, showing only `category`.
    pub fn with_filter(&self, category: impl Into<String>) -> Self {
        Self {
            records: Arc::clone(&self.records),
            category_field: self.category_field.clone(),
            filter: Some(category.into()),
        }
    }

    /// Same records, no filter.
    pub fn cleared(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            category_field: self.category_field.clone(),
            filter: None,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn category_field(&self) -> &str {
        &self.category_field
    }

    /// Records passing the filter, in load order.
    pub fn visible(&self) -> Vec<Record> {
        match &self.filter {
            None => self.records.to_vec(),
            Some(category) => self
                .records
                .iter()
                .filter(|r| r.key(&self.category_field) == *category)
                .cloned()
                .collect(),
        }
    }
}

/// Knobs for [`summarize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub histogram_bins: usize,
    pub percentiles: Vec<f64>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

/// Everything a dashboard view draws for one state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub filter: Option<String>,
    pub total_records: usize,
    pub visible_records: usize,
    /// Records per category over the unfiltered set
    pub category_counts: IndexMap<String, usize>,
    pub departments: IndexMap<String, AggregateResult>,
    pub salary: Option<DistributionStats>,
    pub salary_percentiles: IndexMap<String, f64>,
    pub salary_histogram: Vec<Bin>,
    pub salary_outliers: usize,
    pub satisfaction_productivity_correlation: f64,
    pub satisfaction_productivity_fit: RegressionLine,
    pub insights: Vec<Insight>,
}

/// Summarize `state`. Category counts always cover all records so a view
/// can offer every category as a filter; everything else covers the
/// visible records only.
pub fn summarize(
    state: &DashboardState,
    analyzer: &MetricsAnalyzer,
    options: &SummaryOptions,
) -> DashboardSummary {
    let f = &analyzer.fields;
    let visible = state.visible();
    tracing::debug!(
        filter = ?state.filter(),
        visible = visible.len(),
        total = state.records().len(),
        "summarizing dashboard"
    );

    DashboardSummary {
        generated_at: Utc::now(),
        filter: state.filter.clone(),
        total_records: state.records().len(),
        visible_records: visible.len(),
        category_counts: count_by(state.records(), state.category_field()),
        departments: analyzer.department_metrics(&visible),
        salary: stats(&visible, &f.salary),
        salary_percentiles: percentiles(&visible, &f.salary, &options.percentiles),
        salary_histogram: histogram(&visible, &f.salary, options.histogram_bins),
        salary_outliers: outliers(&visible, &f.salary).len(),
        satisfaction_productivity_correlation: correlation(
            &visible,
            &f.satisfaction,
            &f.productivity,
        ),
        satisfaction_productivity_fit: regression(&visible, &f.satisfaction, &f.productivity),
        insights: generate_insights(analyzer, &visible),
    }
}
