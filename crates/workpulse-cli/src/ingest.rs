//! CSV ingestion.
//!
//! Reads a delimited file, resolves its header row through the configured
//! [`ColumnMap`] and normalizes the rows.

use std::path::{Path, PathBuf};

use clap::Args;
use workpulse_core::{normalize, ColumnMap, Config, Record};

/// Input file options shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CSV file to analyze
    #[arg(short, long)]
    pub file: PathBuf,
    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
    /// Analyze rows as read, skipping validation and numeric coercion
    #[arg(long)]
    pub no_normalize: bool,
}

/// Read every row of `path` as a text record keyed by logical field name.
pub fn read_csv(path: &Path, delimiter: u8, columns: &ColumnMap) -> csv::Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let resolved = columns.resolve(headers.as_slice());
    if !resolved.missing.is_empty() {
        tracing::debug!(missing = ?resolved.missing, "columns without a source header");
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(resolved.record(row.iter()));
    }
    Ok(records)
}

/// Read and (unless disabled) normalize the input file.
pub fn load(input: &InputArgs, config: &Config) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    if !input.delimiter.is_ascii() {
        return Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            input.delimiter
        )
        .into());
    }

    let raw = read_csv(&input.file, input.delimiter as u8, &config.column_map())?;
    tracing::info!(rows = raw.len(), file = %input.file.display(), "loaded csv");

    if input.no_normalize {
        return Ok(raw);
    }

    let normalized = normalize(&raw, &config.normalize_rules());
    if !normalized.rejected.is_empty() {
        tracing::info!(
            kept = normalized.records.len(),
            excluded = normalized.rejected.len(),
            "excluded invalid rows"
        );
    }
    Ok(normalized.records)
}
