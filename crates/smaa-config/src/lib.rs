//! Configuration system for the SMAA engine.
//!
//! Load simulation configuration from TOML or YAML files to control the
//! iteration count, chunking, seeding, sharding and sorting parameters
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use smaa_config::{ConfidenceMode, SimulationConfig, ThreadCount};
//!
//! let config = SimulationConfig::from_toml_str(r#"
//!     iterations = 20000
//!     chunk_size = 500
//!     random_seed = 42
//!     thread_count = { count = 4 }
//!     confidence = "sampled"
//!
//!     [electre]
//!     lambda = 0.7
//!     rule = "optimistic"
//! "#).unwrap();
//!
//! assert_eq!(config.iterations, 20000);
//! assert_eq!(config.thread_count, ThreadCount::Count(4));
//! assert_eq!(config.confidence, ConfidenceMode::Sampled);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use smaa_config::SimulationConfig;
//!
//! let config = SimulationConfig::load("smaa.toml").unwrap_or_default();
//! assert_eq!(config.iterations, 10_000);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use smaa_core::Interval;
use thiserror::Error;

/// Default number of Monte Carlo iterations.
pub const DEFAULT_ITERATIONS: u64 = 10_000;

/// Default number of iterations between progress reports.
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000;

/// Default ELECTRE TRI cutting level.
pub const DEFAULT_LAMBDA: f64 = 0.75;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_iterations() -> u64 {
    DEFAULT_ITERATIONS
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

/// Main simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Number of Monte Carlo iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Iterations per chunk; progress and cancellation are handled between chunks.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of independent shards (each with its own random stream).
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// How confidence factors are computed.
    #[serde(default)]
    pub confidence: ConfidenceMode,

    /// ELECTRE TRI / SMAA-TRI parameters.
    #[serde(default)]
    pub electre: Option<ElectreConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            random_seed: None,
            thread_count: ThreadCount::default(),
            confidence: ConfidenceMode::default(),
            electre: None,
        }
    }
}

impl SimulationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("iterations must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be positive".into()));
        }
        if let ThreadCount::Count(0) = self.thread_count {
            return Err(ConfigError::Invalid("thread_count must be positive".into()));
        }
        if let Some(electre) = &self.electre {
            electre.validate()?;
        }
        Ok(())
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the shard count.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Sets the confidence factor mode.
    pub fn with_confidence(mut self, confidence: ConfidenceMode) -> Self {
        self.confidence = confidence;
        self
    }

    /// Sets the ELECTRE TRI parameters.
    pub fn with_electre(mut self, electre: ElectreConfig) -> Self {
        self.electre = Some(electre);
        self
    }
}

/// Number of shards a simulation is split into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// One shard per available CPU.
    #[default]
    Auto,

    /// A single shard on the calling thread.
    None,

    /// Specific number of shards.
    Count(usize),
}

impl ThreadCount {
    /// Resolves to a concrete shard count (at least 1).
    pub fn resolve(self) -> usize {
        match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            ThreadCount::None => 1,
            ThreadCount::Count(n) => n.max(1),
        }
    }
}

/// How confidence factors are estimated after the rank acceptability run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Re-score once with each central weight vector against expected
    /// measurement values.
    #[default]
    ExpectedValues,

    /// Re-run the trials with sampled measurements for each central weight vector.
    Sampled,
}

/// ELECTRE TRI assignment rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRuleConfig {
    #[default]
    Pessimistic,
    Optimistic,
}

/// ELECTRE TRI / SMAA-TRI configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ElectreConfig {
    /// Cutting level used by deterministic ELECTRE TRI.
    #[serde(default = "default_lambda")]
    pub lambda: f64,

    /// Lambda range sampled uniformly by SMAA-TRI; `[lambda, lambda]` when unset.
    #[serde(default)]
    pub lambda_range: Option<[f64; 2]>,

    /// Assignment rule.
    #[serde(default)]
    pub rule: AssignmentRuleConfig,

    /// Whether veto thresholds block outranking.
    #[serde(default)]
    pub veto: bool,
}

impl Default for ElectreConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            lambda_range: None,
            rule: AssignmentRuleConfig::default(),
            veto: false,
        }
    }
}

impl ElectreConfig {
    /// Returns the lambda interval sampled by SMAA-TRI.
    ///
    /// # Examples
    ///
    /// ```
    /// use smaa_config::ElectreConfig;
    ///
    /// let config = ElectreConfig { lambda_range: Some([0.65, 0.85]), ..Default::default() };
    /// let range = config.lambda_interval().unwrap();
    /// assert_eq!((range.lo(), range.hi()), (0.65, 0.85));
    /// ```
    pub fn lambda_interval(&self) -> Result<Interval, ConfigError> {
        let [lo, hi] = self.lambda_range.unwrap_or([self.lambda, self.lambda]);
        let interval = Interval::new(lo, hi).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if interval.lo() < 0.0 || interval.hi() > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "lambda range {interval} must lie within [0, 1]"
            )));
        }
        Ok(interval)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(ConfigError::Invalid(format!(
                "lambda must lie within [0, 1], got {}",
                self.lambda
            )));
        }
        self.lambda_interval().map(|_| ())
    }
}

#[cfg(test)]
mod tests;
