use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default config file location, overridable with `REDDIT_CONFIG_PATH`.
pub const DEFAULT_CONFIG_PATH: &str = "./reddit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing or empty config value: reddit.config.{0}")]
    MissingValue(&'static str),
}

/// Application configuration loaded from a TOML file.
///
/// The file carries a `[reddit.config]` table with the credentials the
/// API client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub reddit: RedditSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSection {
    pub config: Credentials,
}

/// OAuth2 script-app credentials for the Reddit API.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from `REDDIT_CONFIG_PATH` or the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("REDDIT_CONFIG_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(Path::new(&path))
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if any credential field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let creds = &self.reddit.config;
        let fields = [
            ("client_id", &creds.client_id),
            ("client_secret", &creds.client_secret),
            ("user_agent", &creds.user_agent),
            ("username", &creds.username),
            ("password", &creds.password),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingValue(name));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.reddit.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
[reddit.config]
client_id = "abc123"
client_secret = "shhh"
user_agent = "reddit-inactivity/0.1 by tester"
username = "tester"
password = "hunter2"
"#;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("reddit.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        (dir, path)
    }

    #[test]
    fn test_parse_valid_config() {
        let (_dir, path) = write_config(VALID_CONFIG);
        let config = Config::from_file(&path).expect("Failed to load config");

        assert_eq!(config.credentials().client_id, "abc123");
        assert_eq!(config.credentials().username, "tester");
        config.validate().expect("Config should validate");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_file(Path::new("/nonexistent/reddit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let (_dir, path) = write_config("[other]\nkey = \"value\"\n");
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_field_fails_validation() {
        let (_dir, path) = write_config(&VALID_CONFIG.replace("\"abc123\"", "\"\""));
        let config = Config::from_file(&path).expect("Failed to load config");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("client_id")));
    }
}
