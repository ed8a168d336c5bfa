use clap::Subcommand;
use serde_json::json;
use workpulse_core::stats::{generate_insights, with_work_life_balance, WORK_LIFE_FIELD};
use workpulse_core::{summarize, AggregateOp, Aggregation, Config, DashboardState};

use super::print_json;
use crate::ingest::{self, InputArgs};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Full dashboard summary, optionally filtered to one department
    Summary {
        #[command(flatten)]
        input: InputArgs,
        /// Department to show (all departments when omitted)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Per-department averages, extremes and performance score
    Departments {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Per-zone and per-city averages
    Geography {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Work-life balance score averaged per department
    WorkLife {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Plain-language findings
    Insights {
        #[command(flatten)]
        input: InputArgs,
    },
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let analyzer = config.analyzer();

    match action {
        ReportAction::Summary { input, filter } => {
            let records = ingest::load(&input, &config)?;
            let mut state = DashboardState::new(records, config.fields.department.as_str());
            if let Some(category) = filter {
                state = state.with_filter(category);
            }
            print_json(&summarize(&state, &analyzer, &config.dashboard))?;
        }
        ReportAction::Departments { input } => {
            let records = ingest::load(&input, &config)?;
            let departments = analyzer.department_metrics(&records);
            let (best, worst) = match analyzer.best_and_worst(&departments) {
                Some(((best, _), (worst, _))) => (Some(best.to_string()), Some(worst.to_string())),
                None => (None, None),
            };
            print_json(&json!({
                "departments": departments,
                "best": best,
                "worst": worst,
            }))?;
        }
        ReportAction::Geography { input } => {
            let records = ingest::load(&input, &config)?;
            print_json(&analyzer.geographic_metrics(&records))?;
        }
        ReportAction::WorkLife { input } => {
            let records = ingest::load(&input, &config)?;
            let scored = with_work_life_balance(&records, &config.fields);
            let by_department = config.aggregator().aggregate(
                &scored,
                &config.fields.department,
                &[
                    Aggregation::new(WORK_LIFE_FIELD, AggregateOp::Avg),
                    Aggregation::new(WORK_LIFE_FIELD, AggregateOp::Min),
                ],
            );
            print_json(&by_department)?;
        }
        ReportAction::Insights { input } => {
            let records = ingest::load(&input, &config)?;
            print_json(&generate_insights(&analyzer, &records))?;
        }
    }
    Ok(())
}
