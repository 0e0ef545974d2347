//! 核心模块 - 配置和错误定义
//!
//! - [`Config`] - 进程配置 (环境变量)
//! - [`ScraperError`] - 启动与运行错误

pub mod config;
pub mod error;

pub use config::{Config, ConfigError};
pub use error::ScraperError;
