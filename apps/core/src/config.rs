//! Server configuration read from the environment (and `.env` when present).

use crate::error::AppError;
use crate::fs_manager::{ContentPaths, PortablePathManager};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use validator::Validate;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration of the whisper service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host or IP address to bind.
    #[validate(length(min = 1))]
    pub host: String,
    /// TCP port to bind. Port 0 (ephemeral) is rejected.
    #[validate(range(min = 1))]
    pub port: u16,
    /// Directory holding aliasMap.json, whispers.json, categoryTiers.json and fallback.txt.
    pub data_dir: PathBuf,
    /// Emit bunyan-style JSON logs instead of the pretty formatter.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PortablePathManager::data_dir(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from `WHISPER_*` environment variables.
    ///
    /// Unset variables keep their defaults; malformed values are reported as
    /// [`AppError::Config`] rather than silently ignored.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(host) = env::var("WHISPER_HOST") {
            config.host = host.trim().to_string();
        }

        if let Ok(port) = env::var("WHISPER_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("WHISPER_PORT '{}': {}", port, e)))?;
        }

        if let Ok(dir) = env::var("WHISPER_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Ok(flag) = env::var("WHISPER_LOG_JSON") {
            config.log_json = parse_flag(&flag)
                .ok_or_else(|| AppError::Config(format!("WHISPER_LOG_JSON '{}' is not a boolean", flag)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn content_paths(&self) -> ContentPaths {
        ContentPaths::in_dir(&self.data_dir)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 4] = ["WHISPER_HOST", "WHISPER_PORT", "WHISPER_DATA_DIR", "WHISPER_LOG_JSON"];

    fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars(unset_all(), || {
            let config = ServerConfig::from_env().expect("defaults should be valid");
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 3000);
            assert!(!config.log_json);
            assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        });
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            vec![
                ("WHISPER_HOST", Some("0.0.0.0")),
                ("WHISPER_PORT", Some("8080")),
                ("WHISPER_DATA_DIR", Some("/srv/whispers")),
                ("WHISPER_LOG_JSON", Some("true")),
            ],
            || {
                let config = ServerConfig::from_env().expect("overrides should be valid");
                assert_eq!(config.bind_addr(), "0.0.0.0:8080");
                assert_eq!(config.data_dir, PathBuf::from("/srv/whispers"));
                assert!(config.log_json);
                assert_eq!(
                    config.content_paths().fallback,
                    PathBuf::from("/srv/whispers/fallback.txt")
                );
            },
        );
    }

    #[test]
    fn test_malformed_port_is_config_error() {
        temp_env::with_vars(
            vec![("WHISPER_PORT", Some("not-a-port")), ("WHISPER_HOST", None)],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(matches!(err, AppError::Config(_)));
            },
        );
    }

    #[test]
    fn test_zero_port_fails_validation() {
        temp_env::with_vars(vec![("WHISPER_PORT", Some("0")), ("WHISPER_HOST", None)], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });
    }

    #[test]
    fn test_empty_host_fails_validation() {
        temp_env::with_vars(vec![("WHISPER_HOST", Some("  ")), ("WHISPER_PORT", None)], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
