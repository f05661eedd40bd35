//! Configuration validation rules.

use super::schema::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.api.port == 0 {
        errors.push("api.port must be > 0".to_string());
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(format!(
            "logging.level must be one of {:?}, got {:?}",
            LOG_LEVELS, config.logging.level
        ));
    }
    if !["text", "json"].contains(&config.logging.format.as_str()) {
        errors.push(format!(
            "logging.format must be \"text\" or \"json\", got {:?}",
            config.logging.format
        ));
    }

    for (name, members) in &config.groups {
        if name.trim().is_empty() {
            errors.push("groups must not contain an empty name".to_string());
        }
        if members.iter().any(|m| m.trim().is_empty()) {
            errors.push(format!("group {name:?} has an empty member name"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Config(errors.join("; ")))
    }
}
