use super::traits::{invalid, ConfigSection};
use crate::error::ProteinDbError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Upper bound on a single encode call
    pub timeout_ms: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl EncoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ConfigSection for EncoderConfig {
    fn section_name() -> &'static str {
        "encoder"
    }

    fn validate(&self) -> Result<(), ProteinDbError> {
        if self.timeout_ms == 0 {
            return Err(invalid(Self::section_name(), "timeout_ms must be positive"));
        }
        Ok(())
    }
}
