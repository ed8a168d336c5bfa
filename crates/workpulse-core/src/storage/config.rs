//! TOML-based application configuration.
//!
//! Stores analysis preferences including:
//! - Logical field names and source column aliases
//! - Record normalization requirements
//! - Aggregation policy and performance-score weights
//! - Range bands for age, salary and price
//! - Dashboard summary options
//!
//! Configuration is stored at `~/.config/workpulse/config.toml` unless
//! `WORKPULSE_CONFIG` names another file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{data_dir, CONFIG_ENV};
use crate::columns::ColumnMap;
use crate::dashboard::SummaryOptions;
use crate::error::ConfigError;
use crate::fields::FieldNames;
use crate::normalize::NormalizeRules;
use crate::stats::{
    Aggregator, Bands, EmptyExtrema, MetricsAnalyzer, PerformanceWeights, MAX_HISTOGRAM_BINS,
};

/// Aggregation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// What min/max report for groups without numeric values
    pub empty_extrema: EmptyExtrema,
    pub performance: PerformanceWeights,
}

/// Band definitions for derived range fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandsConfig {
    pub age: Bands,
    pub salary: Bands,
    pub price: Bands,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            age: Bands::age_groups(),
            salary: Bands::salary_ranges(),
            price: Bands::price_categories(),
        }
    }
}

/// Application configuration.
///
/// `columns` and `normalize` are derived from `fields` when not set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fields: FieldNames,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<NormalizeRules>,
    pub aggregation: AggregationConfig,
    pub bands: BandsConfig,
    pub dashboard: SummaryOptions,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let not_number = || invalid(format!("cannot parse '{value}' as number"));
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(not_number)?
                        } else {
                            return Err(not_number());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Config file location: `WORKPULSE_CONFIG` or the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
            _ => Ok(data_dir()?.join("config.toml")),
        }
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config missing, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check band definitions and summary options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, bands) in [
            ("bands.age", &self.bands.age),
            ("bands.salary", &self.bands.salary),
            ("bands.price", &self.bands.price),
        ] {
            bands.validate().map_err(|e| ConfigError::InvalidValue {
                key: name.to_string(),
                message: e.to_string(),
            })?;
        }
        if let Some(p) = self
            .dashboard
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.percentiles".into(),
                message: format!("percentiles must be between 0 and 100, got {p}"),
            });
        }
        if !(1..=MAX_HISTOGRAM_BINS).contains(&self.dashboard.histogram_bins) {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.histogram_bins".into(),
                message: format!("must be between 1 and {MAX_HISTOGRAM_BINS}"),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Column aliases, derived from `fields` unless configured.
    pub fn column_map(&self) -> ColumnMap {
        self.columns
            .clone()
            .unwrap_or_else(|| ColumnMap::for_fields(&self.fields))
    }

    /// Normalization rules, derived from `fields` unless configured.
    pub fn normalize_rules(&self) -> NormalizeRules {
        self.normalize
            .clone()
            .unwrap_or_else(|| NormalizeRules::for_fields(&self.fields))
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::with_empty_extrema(self.aggregation.empty_extrema)
    }

    /// Metrics analyzer configured from fields, weights and aggregation policy.
    pub fn analyzer(&self) -> MetricsAnalyzer {
        MetricsAnalyzer::with_settings(
            self.fields.clone(),
            self.aggregation.performance.clone(),
            self.aggregator(),
        )
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
