//! Statistics module for workpulse
//!
//! Grouping, aggregation, distribution analysis, correlation/regression,
//! derived per-record fields, and the employee metric and insight bundles.
//! Every function here is a pure computation over borrowed records.

mod aggregate;
mod correlation;
mod derived;
mod distribution;
mod grouping;
mod insights;
mod metrics;

pub use aggregate::{
    aggregate, result_key, AggregateOp, AggregateResult, Aggregation, Aggregator,
    CompositeScore, EmptyExtrema, Rescale, ScoreComponent,
};

pub use correlation::{
    correlation, linear_regression, paired_values, pearson, regression, RegressionLine,
};

pub use derived::{
    with_band, with_work_life_balance, work_life_balance_score, Band, Bands, WORK_LIFE_FIELD,
};

pub use distribution::{
    histogram, nearest_rank, outlier_bounds, outliers, percentiles, stats, Bin,
    DistributionStats, OutlierBounds, DEFAULT_PERCENTILES, IQR_FENCE, MAX_HISTOGRAM_BINS,
};

pub use grouping::{count_by, group_by, Groups};

pub use insights::{
    format_currency, generate_insights, Insight, InsightKind, STRONG_CORRELATION,
    WORK_LIFE_TARGET,
};

pub use metrics::{GeographicMetrics, MetricsAnalyzer, PerformanceWeights, PERFORMANCE_SCORE};
