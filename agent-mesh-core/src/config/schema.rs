//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Root configuration for agent-mesh
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API server configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Groups seeded into the registry at startup, name to member list.
    /// A BTreeMap so seeding order is deterministic.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Skip API initialization entirely
    #[serde(default)]
    pub disabled: bool,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.api.disabled);
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.logging.level, "info");
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"api": {"port": 8080}}"#).unwrap();
        assert_eq!(config.api.port, 8080);
        assert!(!config.api.disabled);
        assert_eq!(config.logging.format, "text");
    }
}
