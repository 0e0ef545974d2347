//! Reporter configuration

use std::str::FromStr;
use std::time::Duration;

use shared::retry::{Backoff, RetryPolicy, STORE_RETRY_ATTEMPTS};
use shared::store::StoreConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Reporter configuration
///
/// | 环境变量 | 默认值 |
/// |----------|--------|
/// | REPORTER_HOST | 0.0.0.0 |
/// | REPORTER_PORT | 5000 |
/// | STORE_HOST / STORE_PORT | localhost / 8000 |
/// | STORE_ENDPOINT | - |
/// | STORE_NAMESPACE / STORE_DATABASE | shop / products |
/// | STORE_USERNAME / STORE_PASSWORD | - |
/// | STORE_RETRY_ATTEMPTS / STORE_RETRY_DELAY_SECS | 5 / 5 |
/// | LOG_LEVEL | info |
/// | LOG_DIR | - |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub store_retry: RetryPolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = match var("STORE_ENDPOINT") {
            Some(endpoint) => StoreConfig::with_endpoint(endpoint),
            None => StoreConfig::remote(
                &var("STORE_HOST").unwrap_or_else(|| "localhost".into()),
                parse_or(&var, "STORE_PORT", 8000)?,
            ),
        }
        .namespace(
            var("STORE_NAMESPACE").unwrap_or_else(|| "shop".into()),
            var("STORE_DATABASE").unwrap_or_else(|| "products".into()),
        )
        .credentials(var("STORE_USERNAME"), var("STORE_PASSWORD"));

        Ok(Self {
            host: var("REPORTER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "REPORTER_PORT", 5000)?,
            store,
            store_retry: RetryPolicy::new(
                parse_or(&var, "STORE_RETRY_ATTEMPTS", STORE_RETRY_ATTEMPTS)?,
                Backoff::Fixed(Duration::from_secs(parse_or(&var, "STORE_RETRY_DELAY_SECS", 5)?)),
            ),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
