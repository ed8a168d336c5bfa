//! # workpulse Core Library
//!
//! This library provides the analytics behind the workpulse employee and
//! product dashboards. It follows a CLI-first philosophy: every computation
//! is a pure function over in-memory records, and the `workpulse-cli` binary
//! is a thin layer that ingests CSV files and prints the results.
//!
//! ## Architecture
//!
//! - **Normalizer**: coerces raw text rows into typed records and drops rows
//!   that cannot be analyzed
//! - **Statistics**: grouping, aggregation, distribution, correlation and
//!   regression, derived fields, metric bundles and insights
//! - **Dashboard**: an explicit state value (records + filter) and the
//!   summary computed from it
//! - **Storage**: TOML-based configuration, including source column aliases
//!
//! ## Key Components
//!
//! - [`Record`]: ordered field/value mapping every function consumes
//! - [`normalize()`]: record validation and coercion
//! - [`stats`]: the statistics functions
//! - [`DashboardState`]: filterable application state
//! - [`Config`]: application configuration management

pub mod columns;
pub mod dashboard;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod record;
pub mod stats;
pub mod storage;

pub use columns::{ColumnMap, ResolvedColumns};
pub use dashboard::{summarize, DashboardState, DashboardSummary, SummaryOptions};
pub use error::{ConfigError, CoreError, ValidationError};
pub use fields::FieldNames;
pub use normalize::{normalize, NormalizeRules, Normalized, RejectReason, Rejection};
pub use record::{numeric_values, Record, Value, MISSING_KEY};
pub use stats::{
    AggregateOp, AggregateResult, Aggregation, Aggregator, Bands, DistributionStats,
    EmptyExtrema, Insight, MetricsAnalyzer, RegressionLine,
};
pub use storage::Config;
