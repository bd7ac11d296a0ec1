use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Longest accepted title, in characters
    pub max_title_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "JOT_API_BIND_ADDR", "127.0.0.1:3001")
            .parse::<SocketAddr>()
            .map_err(|_| {
                ConfigError::Invalid("JOT_API_BIND_ADDR must be a host:port address".to_string())
            })?;

        let max_title_chars = value_or_default(&lookup, "JOT_API_MAX_TITLE_CHARS", "200")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "JOT_API_MAX_TITLE_CHARS must be an integer in [1, 10000]".to_string(),
                )
            })?;
        if !(1..=10_000).contains(&max_title_chars) {
            return Err(ConfigError::Invalid(
                "JOT_API_MAX_TITLE_CHARS must be in [1, 10000]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            max_title_chars,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            max_title_chars: 200,
        }
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
