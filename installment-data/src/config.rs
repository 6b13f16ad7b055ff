//! TOML configuration for the calculator.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults shown below.
//!
//! ```toml
//! [rates]
//! preset = "standard"        # or "alternate"
//! file = "rates.csv"         # optional, relative to the config file
//!
//! [display]
//! decimal_places = 0
//!
//! [logging]
//! level = "info"
//! file = "installment.log"   # optional
//! ```

use std::path::{Path, PathBuf};

use installment_core::{RatePreset, RateTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RateTableLoader, RateTableLoaderError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot load rate table: {0}")]
    Rates(#[from] RateTableLoaderError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub rates: RatesConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Where the committed rate table comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Built-in table used when no file is given, and the table a reset
    /// returns to.
    pub preset: RatePreset,

    /// CSV file overriding the preset.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places shown for monetary values.
    pub decimal_places: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimal_places: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,

    /// Optional file that receives a copy of every log line.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CalculatorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads a config file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }

        tracing::debug!(path = %path.display(), ?config, "loaded calculator config");
        Ok(config)
    }

    fn resolve_paths(
        &mut self,
        base_dir: &Path,
    ) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base_dir.join(&*path);
                }
            }
        };
        resolve(&mut self.rates.file);
        resolve(&mut self.logging.file);
    }

    /// The table a reset returns to.
    pub fn baseline_rates(&self) -> RateTable {
        RateTable::from_preset(self.rates.preset)
    }

    /// The table to start the session with: the CSV file when configured,
    /// otherwise the preset.
    pub fn rate_table(&self) -> Result<RateTable, ConfigError> {
        match &self.rates.file {
            Some(path) => Ok(RateTableLoader::load_from_file(path)?),
            None => Ok(self.baseline_rates()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = CalculatorConfig::from_toml_str("").unwrap();

        assert_eq!(config, CalculatorConfig::default());
        assert_eq!(config.rates.preset, RatePreset::Standard);
        assert_eq!(config.display.decimal_places, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CalculatorConfig::from_toml_str(
            r#"
            [rates]
            preset = "alternate"
            "#,
        )
        .unwrap();

        assert_eq!(config.rates.preset, RatePreset::Alternate);
        assert_eq!(config.rates.file, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let result = CalculatorConfig::from_toml_str("[rates]\npreset = \"legacy\"\n");

        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn rate_table_uses_preset_without_file() {
        let config = CalculatorConfig::from_toml_str("[rates]\npreset = \"alternate\"\n").unwrap();

        let table = config.rate_table().unwrap();

        assert_eq!(table.get(1), dec!(5.5));
        assert_eq!(table, config.baseline_rates());
    }

    #[test]
    fn resolve_paths_joins_relative_paths_only() {
        let mut config = CalculatorConfig::from_toml_str(
            r#"
            [rates]
            file = "rates.csv"

            [logging]
            file = "/var/log/installment.log"
            "#,
        )
        .unwrap();

        config.resolve_paths(Path::new("/etc/installment"));

        assert_eq!(
            config.rates.file,
            Some(PathBuf::from("/etc/installment/rates.csv"))
        );
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/var/log/installment.log"))
        );
    }
}
