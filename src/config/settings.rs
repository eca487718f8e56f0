use std::{path::Path, time::Duration};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `RCACHE__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "RCACHE";
const ENV_SEPARATOR: &str = "__";
/// Looked up in the working directory by [`Settings::load`].
const DEFAULT_FILE: &str = "rcache";

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Pre-allocated key table size.
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `rcache=debug`.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

/// Warn about commands slower than `threshold_us`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowLogConfig {
    pub enabled: bool,
    pub threshold_us: u64,
}

impl SlowLogConfig {
    /// The threshold, or `None` when the slow log is off.
    pub fn threshold(&self) -> Option<Duration> {
        self.enabled
            .then(|| Duration::from_micros(self.threshold_us))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub slowlog: SlowLogConfig,
}

impl Settings {
    /// Defaults, then `./rcache.toml` if present, then `RCACHE__*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Some(File::with_name(DEFAULT_FILE).required(false)),
            env_source(),
        )
    }

    /// Defaults, then the given TOML file (which must exist), then the
    /// environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        Self::build(Some(file), env_source())
    }

    fn build(
        file: Option<File<config::FileSourceFile, FileFormat>>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("store.initial_capacity", 0_u64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.ansi", true)?
            .set_default("slowlog.enabled", true)?
            .set_default("slowlog.threshold_us", 10_000_u64)?;
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder.add_source(env).build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                initial_capacity: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Compact,
                ansi: true,
            },
            slowlog: SlowLogConfig {
                enabled: true,
                threshold_us: 10_000,
            },
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}
