pub mod config;
mod loader;

pub use config::{CalculatorConfig, ConfigError, DisplayConfig, LoggingConfig, RatesConfig};
pub use loader::{RateRecord, RateTableLoader, RateTableLoaderError};
