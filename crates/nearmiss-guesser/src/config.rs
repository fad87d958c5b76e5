//! Search configuration

use std::path::PathBuf;
use std::time::Duration;

use nearmiss_core::Strategy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default Prometheus port
pub const DEFAULT_METRICS_PORT: u16 = 8120;

/// Default console frame rate
pub const DEFAULT_FPS: u32 = 60;

/// Settings for one search run
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index strategy
    pub strategy: Strategy,
    /// Target file; the built-in list is used when unset
    pub addresses: Option<PathBuf>,
    /// Stop after this many seconds
    pub timeout_secs: Option<u64>,
    /// Stop after this many guesses
    pub max_guesses: Option<u64>,
    /// Worker threads
    pub threads: usize,
    /// Progress lines per second; 0 prints every guess
    pub fps: u32,
    /// Port for the Prometheus endpoint; `None` disables it
    pub metrics_port: Option<u16>,
    /// Suppress console animation
    pub quiet: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            addresses: None,
            timeout_secs: None,
            max_guesses: None,
            threads: default_threads(),
            fps: DEFAULT_FPS,
            metrics_port: Some(DEFAULT_METRICS_PORT),
            quiet: false,
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl SearchConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_max_guesses(mut self, max: u64) -> Self {
        self.max_guesses = Some(max);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn without_metrics(mut self) -> Self {
        self.metrics_port = None;
        self
    }

    /// Number of workers to spawn, at least one
    pub fn worker_count(&self) -> usize {
        self.threads.max(1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|&s| s > 0).map(Duration::from_secs)
    }

    /// Guess limit; zero means unlimited
    pub fn guess_limit(&self) -> Option<u64> {
        self.max_guesses.filter(|&n| n > 0)
    }

    /// Minimum time between progress lines, `None` for no throttling
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.fps)))
    }
}
