use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration of the `lifecycle-host` binary
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HostConfig {
    pub log: LogConfig,
    pub heartbeat: HeartbeatConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    /// Log level used when no command line flag overrides it
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HeartbeatConfig {
    /// Milliseconds between heartbeats
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Heartbeats before the service requests its own shutdown (0 = never)
    #[serde(default)]
    pub max_beats: u64,

    /// Idle period during stop, cut short if the shutdown is hurried
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl HostConfig {
    /// Load configuration from a file, falling back to defaults.
    ///
    /// The file is optional. `LIFECYCLE_`-prefixed environment variables
    /// override it, with `__` separating sections, e.g.
    /// `LIFECYCLE_HEARTBEAT__MAX_BEATS=10`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("log.level", default_log_level())?
            .set_default("log.format", "pretty")?
            .set_default("heartbeat.interval_ms", default_interval_ms() as i64)?
            .set_default("heartbeat.max_beats", 0_i64)?
            .set_default("heartbeat.stop_grace_ms", default_stop_grace_ms() as i64)?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(
                Environment::with_prefix("LIFECYCLE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: HostConfig = settings.try_deserialize()?;
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(ConfigError::Message(format!(
                "Unknown log level '{}', expected one of: {}",
                self.log.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.heartbeat.interval_ms == 0 {
            return Err(ConfigError::Message(
                "Heartbeat interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML, as printed by `--print-config`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log: LogConfig {
                level: default_log_level(),
                format: LogFormat::default(),
            },
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_beats: 0,
            stop_grace_ms: default_stop_grace_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_stop_grace_ms() -> u64 {
    500
}
