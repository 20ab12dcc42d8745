//! Configuration loading from hornet.toml
//!
//! Hornet configuration can be specified in a `hornet.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use hornet_runner::{DEFAULT_LEARN_MORE_URL, DEFAULT_QUERY_MARKER, OrchestratorConfig, SuiteConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the configuration file looked up by [`HornetConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "hornet.toml";

/// Errors raised while loading or resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a config file failed
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File that was accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A duration string could not be parsed
    #[error("Invalid duration '{value}' for {field}: {reason}")]
    InvalidDuration {
        /// Dotted name of the offending key
        field: &'static str,
        /// Value as written
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// `format` is neither human nor json
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// `hornet init` would overwrite an existing file
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// Hornet configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HornetConfig {
    /// Orchestrator configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Sampling configuration
    #[serde(default)]
    pub suite: SuiteSection,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Where benchmark definitions live
    #[serde(default)]
    pub definitions: DefinitionsConfig,
}

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON run report
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Delay between successful steps (e.g., "25ms")
    #[serde(default = "default_settle_delay")]
    pub settle_delay: String,
    /// Delay after an aborted benchmark (e.g., "250ms")
    #[serde(default = "default_cooldown_delay")]
    pub cooldown_delay: String,
    /// How long a context may take to load
    #[serde(default = "default_timeout")]
    pub load_timeout: String,
    /// How long a deferred run may stay unresolved
    #[serde(default = "default_timeout")]
    pub run_timeout: String,
    /// Context viewport width
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    /// Context viewport height
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Query marker appended to benchmark paths
    #[serde(default = "default_query_marker")]
    pub query_marker: String,
    /// Link shown with the final index
    #[serde(default = "default_learn_more_url")]
    pub learn_more_url: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            settle_delay: default_settle_delay(),
            cooldown_delay: default_cooldown_delay(),
            load_timeout: default_timeout(),
            run_timeout: default_timeout(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            query_marker: default_query_marker(),
            learn_more_url: default_learn_more_url(),
        }
    }
}

fn default_settle_delay() -> String {
    "25ms".to_string()
}
fn default_cooldown_delay() -> String {
    "250ms".to_string()
}
fn default_timeout() -> String {
    "60s".to_string()
}
fn default_viewport_width() -> u32 {
    800
}
fn default_viewport_height() -> u32 {
    600
}
fn default_query_marker() -> String {
    DEFAULT_QUERY_MARKER.to_string()
}
fn default_learn_more_url() -> String {
    DEFAULT_LEARN_MORE_URL.to_string()
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSection {
    /// Minimum samples per run
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Maximum samples per run
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Minimum sampling time per run (e.g., "1s")
    #[serde(default = "default_min_time")]
    pub min_time: String,
    /// Maximum sampling time per run (e.g., "5s")
    #[serde(default = "default_max_time")]
    pub max_time: String,
}

impl Default for SuiteSection {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            max_samples: default_max_samples(),
            min_time: default_min_time(),
            max_time: default_max_time(),
        }
    }
}

fn default_min_samples() -> usize {
    5
}
fn default_max_samples() -> usize {
    100
}
fn default_min_time() -> String {
    "1s".to_string()
}
fn default_max_time() -> String {
    "5s".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default)]
    pub format: OutputFormat,
    /// Write the JSON run report here after each run
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Benchmark definitions location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    /// Path to the definitions JSON file
    #[serde(default = "default_definitions_path")]
    pub path: String,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            path: default_definitions_path(),
        }
    }
}

fn default_definitions_path() -> String {
    "benchmarks.json".to_string()
}

impl HornetConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `hornet.toml`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Resolve the `[runner]` section
    pub fn orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigError> {
        let runner = &self.runner;
        Ok(OrchestratorConfig {
            settle_delay: duration_field("runner.settle_delay", &runner.settle_delay)?,
            cooldown_delay: duration_field("runner.cooldown_delay", &runner.cooldown_delay)?,
            load_timeout: duration_field("runner.load_timeout", &runner.load_timeout)?,
            run_timeout: duration_field("runner.run_timeout", &runner.run_timeout)?,
            viewport_width: runner.viewport_width,
            viewport_height: runner.viewport_height,
            query_marker: runner.query_marker.clone(),
            learn_more_url: runner.learn_more_url.clone(),
        })
    }

    /// Resolve the `[suite]` section
    pub fn suite_config(&self) -> Result<SuiteConfig, ConfigError> {
        let suite = &self.suite;
        Ok(SuiteConfig {
            min_samples: suite.min_samples,
            max_samples: suite.max_samples.max(suite.min_samples),
            min_time: duration_field("suite.min_time", &suite.min_time)?,
            max_time: duration_field("suite.max_time", &suite.max_time)?,
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        format!(
            r#"# Hornet Configuration

[runner]
# Pause between successful steps
settle_delay = "25ms"
# Pause after an aborted benchmark, before the next context opens
cooldown_delay = "250ms"
# Give up on a context that has not loaded after this long
load_timeout = "60s"
# Abort a deferred run that has not resolved after this long
run_timeout = "60s"
# Context viewport, placed at the bottom-right of the screen
viewport_width = 800
viewport_height = 600
# Appended to each benchmark path as ?<marker>
query_marker = "{DEFAULT_QUERY_MARKER}"
# Shown with the final index
learn_more_url = "{DEFAULT_LEARN_MORE_URL}"

[suite]
# Samples collected per run before it may finish
min_samples = 5
# Hard cap on samples per run
max_samples = 100
# Keep sampling a run at least this long
min_time = "1s"
# Never sample a run longer than this
max_time = "5s"

[output]
# Default output format: human or json
format = "human"
# Write the JSON run report here (uncomment to enable)
# report_path = "target/hornet/report.json"

[definitions]
# Benchmark definitions file
path = "benchmarks.json"
"#
        )
    }

    /// Write [`default_toml`](Self::default_toml) to `hornet.toml` in `dir`.
    ///
    /// An existing file is kept unless `force` is set.
    pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }
        std::fs::write(&path, Self::default_toml()).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty duration string".to_string());
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("duration must be non-negative: {}", num_part));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" | "" => 1_000_000_000.0,
            "m" | "min" => 60_000_000_000.0,
            _ => return Err(format!("unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier) as u64))
    }
}

fn duration_field(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    HornetConfig::parse_duration(value).map_err(|reason| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason,
    })
}
