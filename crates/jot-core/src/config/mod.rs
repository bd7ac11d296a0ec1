//! Client configuration.
//!
//! Resolves where the notes service lives and how long the transport may
//! wait on it. Values come from an explicit override, then the environment,
//! then built-in defaults.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001";
pub const API_URL_VAR: &str = "JOT_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "JOT_REQUEST_TIMEOUT_SECS";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the notes service, without a trailing slash
    pub api_base_url: String,
    /// Transport timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Values that take precedence over the environment, typically CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(overrides, |name| values.get(name).cloned())
    }

    pub fn from_lookup(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_base_url = overrides
            .api_base_url
            .and_then(non_empty)
            .or_else(|| lookup(API_URL_VAR).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => secs,
            None => match lookup(REQUEST_TIMEOUT_VAR).and_then(non_empty) {
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    Error::InvalidConfig(format!(
                        "{REQUEST_TIMEOUT_VAR} must be an integer in [1, {MAX_REQUEST_TIMEOUT_SECS}]"
                    ))
                })?,
                None => DEFAULT_REQUEST_TIMEOUT_SECS,
            },
        };
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(Error::InvalidConfig(format!(
                "request timeout must be in [1, {MAX_REQUEST_TIMEOUT_SECS}] seconds"
            )));
        }

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Trim, require an http(s) scheme, and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidConfig(format!(
            "API base URL must include http:// or https:// (got {trimmed})"
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(ConfigOverrides::default(), lookup_from(&[]))
            .unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_is_used_and_normalized() {
        let config = ClientConfig::from_lookup(
            ConfigOverrides::default(),
            lookup_from(&[
                (API_URL_VAR, " https://notes.example.com/api/ "),
                (REQUEST_TIMEOUT_VAR, "30"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://notes.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_win_over_environment() {
        let overrides = ConfigOverrides {
            api_base_url: Some("http://localhost:9000".to_string()),
            request_timeout_secs: Some(5),
        };
        let config = ClientConfig::from_lookup(
            overrides,
            lookup_from(&[(API_URL_VAR, "https://ignored.example.com")]),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = ClientConfig::from_lookup(
            ConfigOverrides::default(),
            lookup_from(&[(API_URL_VAR, "notes.example.com")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        for raw in ["0", "301", "soon"] {
            let err = ClientConfig::from_lookup(
                ConfigOverrides::default(),
                lookup_from(&[(REQUEST_TIMEOUT_VAR, raw)]),
            )
            .unwrap_err();
            assert!(err.to_string().contains("timeout") || err.to_string().contains(REQUEST_TIMEOUT_VAR));
        }
    }
}
