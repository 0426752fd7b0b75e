use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::planner::BudgetLimits;
use crate::planner::constants::{BUDGET_STEP, DEFAULT_BUDGET, MAX_BUDGET, MIN_BUDGET};

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ukemeny";

/// Prefix of environment overrides, e.g. `UKEMENY__LOOKUP__API_KEY`.
pub const ENV_PREFIX: &str = "UKEMENY";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory holding the recipe and menu documents.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub budget: BudgetConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BudgetConfig {
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl BudgetConfig {
    pub fn limits(&self) -> BudgetLimits {
        BudgetLimits {
            min: self.min,
            max: self.max,
            step: self.step,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_ms: u64,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub min_query_len: usize,
}

impl LookupConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// Without an explicit path, `ukemeny.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let cfg = ConfigBuilder::builder()
            .set_default("data_dir", ".")?
            .set_default("log_level", "info")?
            .set_default("budget.default", DEFAULT_BUDGET)?
            .set_default("budget.min", MIN_BUDGET)?
            .set_default("budget.max", MAX_BUDGET)?
            .set_default("budget.step", BUDGET_STEP)?
            .set_default("lookup.base_url", "https://kassal.app/api/v1")?
            .set_default("lookup.api_key", "")?
            .set_default("lookup.timeout_ms", 10_000_i64)?
            .set_default("lookup.page_size", 20_i64)?
            .set_default("lookup.debounce_ms", 500_i64)?
            .set_default("lookup.min_query_len", 3_i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.budget;
        if b.min <= 0.0 || b.min > b.max {
            return Err(ConfigError::Message(format!(
                "budget range {}..{} is invalid",
                b.min, b.max
            )));
        }
        b.limits().validate(b.default).map_err(|e| {
            ConfigError::Message(format!("default budget {}: {}", b.default, e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "data_dir = \"/tmp/ukemeny\"\n\n[budget]\ndefault = 1500\n\n[lookup]\napi_key = \"secret\"\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ukemeny"));
        assert_eq!(config.budget.default, 1500.0);
        assert_eq!(config.budget.min, MIN_BUDGET);
        assert!(config.lookup.is_enabled());
        assert_eq!(config.lookup.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_default_outside_range() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[budget]\ndefault = 5000\n").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_rejects_default_off_step() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[budget]\ndefault = 1050\n").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
