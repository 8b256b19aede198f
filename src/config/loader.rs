//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a definition held in memory.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.initial_state, "init");
        assert_eq!(config.logging.level, "info");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_validation_message_lists_all_errors() {
        let err = parse_config("states = [\"a\", \"a\"]\nspecials = [401]\n").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("state `a` declared more than once"));
        assert!(message.contains("invalid special code 401"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("states = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_state = \"guest\"").unwrap();
        writeln!(file, "[[routes]]\nname = \"home\"\npath = \"home\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.initial_state, "guest");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].state, None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(&dir.path().join("absent.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
