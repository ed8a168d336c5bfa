use clap::{Subcommand, ValueEnum};
use serde_json::json;
use workpulse_core::stats::{
    histogram, outlier_bounds, outliers, paired_values, pearson, percentiles, regression, stats,
    with_band, DEFAULT_PERCENTILES, MAX_HISTOGRAM_BINS,
};
use workpulse_core::{AggregateOp, Aggregation, Bands, Config};

use super::print_json;
use crate::ingest::{self, InputArgs};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Descriptive statistics for a numeric field
    Describe {
        #[command(flatten)]
        input: InputArgs,
        /// Field to describe
        #[arg(long)]
        field: String,
    },
    /// Nearest-rank percentiles for a numeric field
    Percentiles {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        field: String,
        /// Percentile to compute (repeatable, default: 25 50 75 95)
        #[arg(short = 'p', long = "percentile")]
        p: Vec<f64>,
    },
    /// Records outside the 1.5 IQR fences
    Outliers {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        field: String,
    },
    /// Equal-width histogram of a numeric field
    Histogram {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        field: String,
        /// Number of bins (default: dashboard.histogram_bins)
        #[arg(
            long,
            value_parser = clap::value_parser!(u64).range(1..=MAX_HISTOGRAM_BINS as u64)
        )]
        bins: Option<u64>,
    },
    /// Group records and reduce fields per group
    Aggregate {
        #[command(flatten)]
        input: InputArgs,
        /// Field to group by
        #[arg(long)]
        by: String,
        /// Aggregation as field:op, op one of avg, sum, min, max (repeatable)
        #[arg(long = "agg")]
        aggregations: Vec<Aggregation>,
    },
    /// Pearson correlation between two numeric fields
    Correlate {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        x: String,
        #[arg(long)]
        y: String,
    },
    /// Least-squares line predicting y from x
    Regress {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        x: String,
        #[arg(long)]
        y: String,
    },
    /// Label a numeric field with configured bands and summarize per band
    Band {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        field: String,
        /// Band set from the config
        #[arg(long, value_enum)]
        kind: BandKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BandKind {
    Age,
    Salary,
    Price,
}

impl BandKind {
    fn bands(self, config: &Config) -> &Bands {
        match self {
            BandKind::Age => &config.bands.age,
            BandKind::Salary => &config.bands.salary,
            BandKind::Price => &config.bands.price,
        }
    }

    fn target(self) -> &'static str {
        match self {
            BandKind::Age => "age_group",
            BandKind::Salary => "salary_range",
            BandKind::Price => "price_category",
        }
    }
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        StatsAction::Describe { input, field } => {
            let records = ingest::load(&input, &config)?;
            print_json(&stats(&records, &field))?;
        }
        StatsAction::Percentiles { input, field, p } => {
            let records = ingest::load(&input, &config)?;
            let ps = if p.is_empty() { DEFAULT_PERCENTILES.to_vec() } else { p };
            if let Some(bad) = ps.iter().find(|p| !(0.0..=100.0).contains(*p)) {
                return Err(format!("percentile must be between 0 and 100, got {bad}").into());
            }
            print_json(&percentiles(&records, &field, &ps))?;
        }
        StatsAction::Outliers { input, field } => {
            let records = ingest::load(&input, &config)?;
            let flagged = outliers(&records, &field);
            print_json(&json!({
                "bounds": outlier_bounds(&records, &field),
                "count": flagged.len(),
                "records": flagged,
            }))?;
        }
        StatsAction::Histogram { input, field, bins } => {
            let bins = bins.map_or(config.dashboard.histogram_bins, |b| b as usize);
            let records = ingest::load(&input, &config)?;
            print_json(&histogram(&records, &field, bins))?;
        }
        StatsAction::Aggregate {
            input,
            by,
            aggregations,
        } => {
            let records = ingest::load(&input, &config)?;
            print_json(&config.aggregator().aggregate(&records, &by, &aggregations))?;
        }
        StatsAction::Correlate { input, x, y } => {
            let records = ingest::load(&input, &config)?;
            let pairs = paired_values(&records, &x, &y);
            print_json(&json!({
                "x": x,
                "y": y,
                "pairs": pairs.len(),
                "correlation": pearson(&pairs),
            }))?;
        }
        StatsAction::Regress { input, x, y } => {
            let records = ingest::load(&input, &config)?;
            print_json(&regression(&records, &x, &y))?;
        }
        StatsAction::Band { input, field, kind } => {
            let records = ingest::load(&input, &config)?;
            let banded = with_band(&records, &field, kind.target(), kind.bands(&config));
            let by_band = config.aggregator().aggregate(
                &banded,
                kind.target(),
                &[
                    Aggregation::new(field.as_str(), AggregateOp::Avg),
                    Aggregation::new(field.as_str(), AggregateOp::Min),
                    Aggregation::new(field.as_str(), AggregateOp::Max),
                ],
            );
            print_json(&by_band)?;
        }
    }
    Ok(())
}
