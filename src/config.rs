//! Engine configuration.
//!
//! Defaults come from [`crate::constants`]; a JSON file can override any
//! subset of fields, and command-line flags override the file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEED, DEFAULT_SIZE, N_SIMS, is_supported_size};
use crate::search::SearchConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: usize,
    /// Playouts per candidate move
    pub simulations: usize,
    pub seed: u64,
    /// Log level spec used when `RUST_LOG` is not set
    pub log_spec: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_SIZE,
            simulations: N_SIMS,
            seed: DEFAULT_SEED,
            log_spec: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_supported_size(self.board_size) {
            bail!("unsupported board size {}", self.board_size);
        }
        if self.simulations == 0 {
            bail!("simulations must be at least 1");
        }
        Ok(())
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            simulations: self.simulations,
            seed: self.seed,
        }
    }
}
