//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::EnumeratorConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::sources::SourceRegistry;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str, registry: &SourceRegistry) -> Result<EnumeratorConfig, ConfigError> {
    let config: EnumeratorConfig = toml::from_str(content)?;
    validate_config(&config, registry).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path, registry: &SourceRegistry) -> Result<EnumeratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
deadline_secs = 120
sources = ["crtsh"]

[[proxies]]
url = "http://proxy1.example.com:8080"
protocol = "http"
username = "user"
password = "pass"

[[proxies]]
url = "http://proxy2.example.com:8080"

[observability]
log_level = "debug"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE, &SourceRegistry::builtin()).unwrap();
        assert_eq!(config.deadline_secs, 120);
        assert_eq!(config.proxies.len(), 2);
        assert_eq!(config.proxies[1].protocol, "http");
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("", &SourceRegistry::builtin()).unwrap();
        assert_eq!(config.deadline_secs, 300);
    }

    #[test]
    fn test_validation_error_lists_everything() {
        let err = parse_config("deadline_secs = 0\nsources = [\"zzz\"]", &SourceRegistry::builtin()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("deadline_secs"));
        assert!(message.contains("zzz"));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_config("deadline_secs = ", &SourceRegistry::builtin()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("subenum-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, SAMPLE).unwrap();
        let config = load_config(&path, &SourceRegistry::builtin()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.sources, vec!["crtsh"]);

        assert!(matches!(
            load_config(&path, &SourceRegistry::builtin()),
            Err(ConfigError::Io(_))
        ));
    }
}
