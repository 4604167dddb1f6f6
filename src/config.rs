//! Traversal engine configuration.
//!
//! Configs are plain serde types so a driver can keep them next to its run
//! parameters and load them from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Worker thread selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadConfig {
    /// Use rayon's global pool (one worker per available core).
    #[default]
    Auto,
    /// Use a dedicated pool of exactly this many workers. `Fixed(1)` runs
    /// every level on the calling thread.
    Fixed(usize),
}

impl ThreadConfig {
    /// Returns the effective number of threads to use.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        match self {
            ThreadConfig::Auto => std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            ThreadConfig::Fixed(n) => *n,
        }
    }
}

/// Tuning knobs for [`crate::BfsEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thread configuration (auto or fixed).
    pub threads: ThreadConfig,
    /// Frontiers smaller than this are expanded on the calling thread.
    pub min_frontier_for_parallel: usize,
    /// Frontier vertices handed to one parallel task.
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: ThreadConfig::Auto,
            min_frontier_for_parallel: 1024,
            chunk_size: 256,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-threaded configuration.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_fixed_threads(1)
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be > 0".into()));
        }
        if self.threads == ThreadConfig::Fixed(0) {
            return Err(ConfigError::Invalid("fixed thread count must be > 0".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_threads(mut self, threads: ThreadConfig) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_fixed_threads(mut self, count: usize) -> Self {
        self.threads = ThreadConfig::Fixed(count);
        self
    }

    #[must_use]
    pub fn with_min_frontier(mut self, min_frontier: usize) -> Self {
        self.min_frontier_for_parallel = min_frontier;
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Whether a frontier of this size is expanded in parallel.
    #[must_use]
    pub fn should_parallelize_frontier(&self, frontier_size: usize) -> bool {
        self.threads != ThreadConfig::Fixed(1) && frontier_size >= self.min_frontier_for_parallel
    }
}
