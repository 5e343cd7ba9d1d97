//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HEPATORISK_ENDPOINT` | `http://127.0.0.1:5000/predict` |
//! | `HEPATORISK_LOG_MODE` | `auto` (`file` when stdout is a terminal, else `stdout`) |
//! | `HEPATORISK_LOG_FILE` | `hepatorisk.log` |

use std::path::PathBuf;

use crate::application::DEFAULT_ENDPOINT;

const DEFAULT_LOG_FILE: &str = "hepatorisk.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HEPATORISK_ENDPOINT must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),

    #[error("HEPATORISK_LOG_MODE must be one of auto, file, stdout; got {0:?}")]
    InvalidLogMode(String),
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when attached to a terminal (the TUI owns the screen), stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::Auto => interactive,
            Self::File => true,
            Self::Stdout => false,
        }
    }
}

impl std::str::FromStr for LogMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            _ => Err(ConfigError::InvalidLogMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: String,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("HEPATORISK_ENDPOINT") {
            let endpoint = endpoint.trim();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
            }
            config.endpoint = endpoint.to_string();
        }

        if let Some(mode) = lookup("HEPATORISK_LOG_MODE") {
            config.log_mode = mode.parse()?;
        }

        if let Some(path) = lookup("HEPATORISK_LOG_FILE").filter(|p| !p.trim().is_empty()) {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("Should load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.endpoint, "http://127.0.0.1:5000/predict");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HEPATORISK_ENDPOINT", " https://risk.example.org/predict "),
            ("HEPATORISK_LOG_MODE", "Stdout"),
            ("HEPATORISK_LOG_FILE", "/tmp/h.log"),
        ]))
        .expect("Should load");
        assert_eq!(config.endpoint, "https://risk.example.org/predict");
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/tmp/h.log"));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = AppConfig::from_lookup(lookup(&[("HEPATORISK_ENDPOINT", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert!("bogus".parse::<LogMode>().is_err());
    }
}
