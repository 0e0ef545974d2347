use std::str::FromStr;
use std::time::Duration;

use shared::retry::{Backoff, RetryPolicy, STORE_RETRY_ATTEMPTS};
use shared::store::StoreConfig;
use thiserror::Error;

use crate::source::{DEFAULT_API_VERSION, FetchOptions};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Scraper configuration
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SHOPIFY_SHOP_URL | (必填) | 店铺域名或 URL |
/// | SHOPIFY_ACCESS_TOKEN | (必填) | Admin API token |
/// | SHOPIFY_API_VERSION | 2022-04 | API 版本 |
/// | SHOPIFY_ORDER_STATUS | open | 订单状态过滤 |
/// | SHOPIFY_PAGE_SIZE | 250 | 每页订单数 |
/// | SHOPIFY_MAX_PAGES | 20 | 每轮最多翻页数 |
/// | SHOPIFY_ORDER_WINDOW_HOURS | - | 只拉取最近 N 小时的订单 |
/// | STORE_HOST / STORE_PORT | localhost / 8000 | 存储地址 |
/// | STORE_ENDPOINT | - | 完整 endpoint, 覆盖 host/port |
/// | STORE_NAMESPACE / STORE_DATABASE | shop / products | |
/// | STORE_USERNAME / STORE_PASSWORD | - | root 登录 |
/// | STORE_RETRY_ATTEMPTS | 5 | 连接重试次数 |
/// | STORE_RETRY_DELAY_SECS | 5 | 重试间隔(秒) |
/// | POLL_INTERVAL_SECS | 2 | 轮询间隔(秒) |
/// | STARTUP_DELAY_SECS | 0 | 首次连接前等待(秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志文件目录 |
#[derive(Clone)]
pub struct Config {
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
    pub fetch: FetchOptions,
    pub store: StoreConfig,
    pub store_retry: RetryPolicy,
    pub poll_interval: Duration,
    pub startup_delay: Duration,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let shop_url = var("SHOPIFY_SHOP_URL").ok_or(ConfigError::Missing("SHOPIFY_SHOP_URL"))?;
        let access_token =
            var("SHOPIFY_ACCESS_TOKEN").ok_or(ConfigError::Missing("SHOPIFY_ACCESS_TOKEN"))?;

        let defaults = FetchOptions::default();
        let fetch = FetchOptions {
            status: var("SHOPIFY_ORDER_STATUS").unwrap_or(defaults.status),
            page_size: parse_or(&var, "SHOPIFY_PAGE_SIZE", defaults.page_size)?,
            max_pages: parse_or(&var, "SHOPIFY_MAX_PAGES", defaults.max_pages)?,
            window: parse_opt::<u64>(&var, "SHOPIFY_ORDER_WINDOW_HOURS")?
                .map(|hours| Duration::from_secs(hours.saturating_mul(3600))),
        };

        let store_host = var("STORE_HOST").unwrap_or_else(|| "localhost".into());
        let store_port: u16 = parse_or(&var, "STORE_PORT", 8000)?;
        let store = match var("STORE_ENDPOINT") {
            Some(endpoint) => StoreConfig::with_endpoint(endpoint),
            None => StoreConfig::remote(&store_host, store_port),
        }
        .namespace(
            var("STORE_NAMESPACE").unwrap_or_else(|| "shop".into()),
            var("STORE_DATABASE").unwrap_or_else(|| "products".into()),
        )
        .credentials(var("STORE_USERNAME"), var("STORE_PASSWORD"));

        let store_retry = RetryPolicy::new(
            parse_or(&var, "STORE_RETRY_ATTEMPTS", STORE_RETRY_ATTEMPTS)?,
            Backoff::Fixed(Duration::from_secs(parse_or(
                &var,
                "STORE_RETRY_DELAY_SECS",
                5,
            )?)),
        );

        Ok(Self {
            shop_url,
            access_token,
            api_version: var("SHOPIFY_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            fetch: fetch.normalized(),
            store,
            store_retry,
            poll_interval: Duration::from_secs(parse_or(&var, "POLL_INTERVAL_SECS", 2)?),
            startup_delay: Duration::from_secs(parse_or(&var, "STARTUP_DELAY_SECS", 0)?),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("shop_url", &self.shop_url)
            .field("access_token", &"***")
            .field("api_version", &self.api_version)
            .field("fetch", &self.fetch)
            .field("store", &self.store)
            .field("store_retry", &self.store_retry)
            .field("poll_interval", &self.poll_interval)
            .field("startup_delay", &self.startup_delay)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

fn parse_opt<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    Ok(parse_opt(var, name)?.unwrap_or(default))
}
