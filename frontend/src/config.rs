use std::env;
use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

use crate::api::DEFAULT_API_URL;

const DEFAULT_LOG_FILE: &str = "taskboard-client.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TASKBOARD_API_URL {value:?} is not a valid URL: {reason}")]
    InvalidApiUrl { value: String, reason: String },
    #[error("TASKBOARD_API_URL {0:?} must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the task service, e.g. `http://localhost:5000/api`.
    pub api_url: String,
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn load() -> Result<ClientConfig, ConfigError> {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        ClientConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("TASKBOARD_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let parsed = Url::parse(&api_url).map_err(|e| ConfigError::InvalidApiUrl {
            value: api_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(api_url));
        }

        let log_file = lookup("TASKBOARD_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(ClientConfig { api_url, log_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(key: &'static str, value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |k| (k == key).then(|| value.to_string())
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.log_file, PathBuf::from("taskboard-client.log"));
    }

    #[test]
    fn api_url_override_is_trimmed() {
        let config = ClientConfig::from_lookup(only("TASKBOARD_API_URL", " http://10.0.0.2:8080/api ")).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:8080/api");
    }

    #[test]
    fn rejects_garbage_url() {
        let err = ClientConfig::from_lookup(only("TASKBOARD_API_URL", "not a url")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::from_lookup(only("TASKBOARD_API_URL", "ftp://example.com/api")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(_)));
    }
}
