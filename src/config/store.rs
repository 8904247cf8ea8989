use super::traits::{invalid, ConfigSection};
use crate::error::ProteinDbError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which record variant a store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Sequence and embedding only
    Simple,
    /// Sequence, embedding and protein metadata
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub mode: StoreMode,
    /// JSON-lines file backing the store; in-memory only when unset.
    /// A record file given on the command line takes precedence.
    pub path: Option<PathBuf>,
    /// `k` used by nearest-neighbour queries that don't give one
    pub default_k: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::Simple,
            path: None,
            default_k: 1000,
        }
    }
}

impl ConfigSection for StoreConfig {
    fn section_name() -> &'static str {
        "store"
    }

    fn validate(&self) -> Result<(), ProteinDbError> {
        if self.default_k == 0 {
            return Err(invalid(Self::section_name(), "default_k must be at least 1"));
        }
        Ok(())
    }
}
