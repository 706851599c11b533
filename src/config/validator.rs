use thiserror::Error;

use crate::config::{LoggingSettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_logging(&settings.logging) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if server.base_url.trim().is_empty() {
            errors.push(ConfigError::MissingField("server.base_url".to_string()));
        } else if !(server.base_url.starts_with("http://")
            || server.base_url.starts_with("https://"))
        {
            errors.push(ConfigError::InvalidValue {
                field: "server.base_url".to_string(),
                reason: format!("'{}' must start with http:// or https://", server.base_url),
            });
        }

        if server.timeout_seconds == 0 {
            errors.push(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_logging(logging: &LoggingSettings) -> Result<(), Vec<ConfigError>> {
        if logging.level.parse::<tracing::Level>().is_err() {
            return Err(vec![ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!(
                    "'{}' is not one of trace, debug, info, warn, error",
                    logging.level
                ),
            }]);
        }
        Ok(())
    }
}
