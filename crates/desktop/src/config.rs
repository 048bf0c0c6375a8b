//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use cmms_navigation::DEFAULT_LOGIN_PATH;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CMMS_API_URL is not a valid http(s) URL: {0}")]
    InvalidApiUrl(String),
    #[error("CMMS_REQUEST_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error("CMMS_LOGIN_PATH must start with '/', got '{0}'")]
    InvalidLoginPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the CMMS API, without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Explicit credential file; `None` falls back to the platform data directory.
    pub credentials_path: Option<PathBuf>,
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            credentials_path: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("CMMS_API_URL") {
            match Url::parse(&url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                    config.api_url = url.trim_end_matches('/').to_string();
                }
                _ => return Err(ConfigError::InvalidApiUrl(url)),
            }
        }

        if let Some(raw) = get("CMMS_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = get("CMMS_CREDENTIALS_PATH") {
            config.credentials_path = Some(PathBuf::from(path));
        }

        if let Some(path) = get("CMMS_LOGIN_PATH") {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidLoginPath(path));
            }
            config.login_path = path;
        }

        Ok(config)
    }

    /// Where the credential file lives: the configured path, or
    /// `<data dir>/cmms/credentials.json`.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.clone().or_else(default_credentials_path)
    }
}

fn default_credentials_path() -> Option<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))?;
    Some(base.join("cmms").join("credentials.json"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(load(&[]).unwrap(), ClientConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = load(&[
            ("CMMS_API_URL", "https://cmms.example.com/api/"),
            ("CMMS_REQUEST_TIMEOUT_SECS", "5"),
            ("CMMS_CREDENTIALS_PATH", "/tmp/creds.json"),
            ("CMMS_LOGIN_PATH", "/sign-in"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://cmms.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.credentials_path(), Some(PathBuf::from("/tmp/creds.json")));
        assert_eq!(config.login_path, "/sign-in");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        assert_eq!(load(&[("CMMS_API_URL", "  ")]).unwrap().api_url, DEFAULT_API_URL);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            load(&[("CMMS_API_URL", "ftp://files")]),
            Err(ConfigError::InvalidApiUrl("ftp://files".into()))
        );
        assert_eq!(
            load(&[("CMMS_REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout("0".into()))
        );
        assert_eq!(
            load(&[("CMMS_REQUEST_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout("soon".into()))
        );
        assert_eq!(
            load(&[("CMMS_LOGIN_PATH", "login")]),
            Err(ConfigError::InvalidLoginPath("login".into()))
        );
    }
}
