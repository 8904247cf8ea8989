use super::traits::{invalid, ConfigSection};
use crate::error::ProteinDbError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ProteinDbError> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            invalid(Self::section_name(), format!("unknown log level '{}'", self.level))
        })
    }
}

impl ConfigSection for LoggingConfig {
    fn section_name() -> &'static str {
        "logging"
    }

    fn validate(&self) -> Result<(), ProteinDbError> {
        self.level_filter().map(|_| ())
    }
}
