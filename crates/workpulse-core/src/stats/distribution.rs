//! Distribution statistics for a single numeric field.
//!
//! All quantiles here use the nearest-rank method: they always return an
//! observed value and never interpolate between two.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::{sorted_values, Record};

/// Percentiles reported when the caller does not choose any.
pub const DEFAULT_PERCENTILES: [f64; 4] = [25.0, 50.0, 75.0, 95.0];

/// Multiplier applied to the IQR for the outlier fences.
pub const IQR_FENCE: f64 = 1.5;

/// Summary statistics for one field over one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    /// Number of numeric values
    pub count: usize,
    pub mean: f64,
    /// Upper median: `sorted[n / 2]`
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by n)
    pub std_dev: f64,
    /// `max - min`
    pub range: f64,
}

impl DistributionStats {
    /// Compute from values already sorted ascending. `None` when empty.
    pub fn from_sorted(values: &[f64]) -> Option<Self> {
        let (&min, &max) = (values.first()?, values.last()?);
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count: values.len(),
            mean,
            median: values[values.len() / 2],
            min,
            max,
            std_dev: variance.sqrt(),
            range: max - min,
        })
    }
}

/// Summary statistics of `field`, or `None` if it has no numeric values.
pub fn stats(records: &[Record], field: &str) -> Option<DistributionStats> {
    DistributionStats::from_sorted(&sorted_values(records, field))
}

/// Nearest-rank percentile of ascending `sorted` values.
///
/// Index is `ceil(p / 100 * n) - 1`, clamped to the slice.
pub fn nearest_rank(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    Some(sorted[index])
}

/// Percentiles of `field`, keyed `"p{p}"` (e.g. `p25`).
///
/// Empty when the field has no numeric values.
pub fn percentiles(records: &[Record], field: &str, ps: &[f64]) -> IndexMap<String, f64> {
    let sorted = sorted_values(records, field);
    ps.iter()
        .filter_map(|&p| nearest_rank(&sorted, p).map(|v| (format!("p{p}"), v)))
        .collect()
}

/// Tukey fences around the quartiles of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Q1 at `sorted[floor(n * 0.25)]`, Q3 at `sorted[floor(n * 0.75)]`.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        if sorted.is_empty() {
            return None;
        }
        let n = sorted.len() as f64;
        let q1 = sorted[(n * 0.25).floor() as usize];
        let q3 = sorted[(n * 0.75).floor() as usize];
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
        })
    }

    /// Strictly outside the fences.
    pub fn is_outlier(&self, v: f64) -> bool {
        v < self.lower || v > self.upper
    }
}

/// Fences for `field`, or `None` if it has no numeric values.
pub fn outlier_bounds(records: &[Record], field: &str) -> Option<OutlierBounds> {
    OutlierBounds::from_sorted(&sorted_values(records, field))
}

/// Records whose `field` lies strictly outside the IQR fences.
///
/// Records without a numeric value for `field` are never outliers.
pub fn outliers<'a>(records: &'a [Record], field: &str) -> Vec<&'a Record> {
    let Some(bounds) = outlier_bounds(records, field) else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| r.number(field).is_some_and(|v| bounds.is_outlier(v)))
        .collect()
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Upper bound on the number of histogram bins.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// Equal-width histogram of `field` over its observed range.
///
/// Bins are half-open except the last, which includes the maximum. A field
/// whose values are all equal yields a single bin. `bins` is capped at
/// [`MAX_HISTOGRAM_BINS`].
pub fn histogram(records: &[Record], field: &str, bins: usize) -> Vec<Bin> {
    let bins = bins.min(MAX_HISTOGRAM_BINS);
    let sorted = sorted_values(records, field);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![Bin {
            lower: min,
            upper: max,
            count: sorted.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in sorted {
        let index = (((v - min) / width).floor() as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}
