// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BINANCE_API_KEY` | API key sent as `X-MBX-APIKEY` | Required |
//! | `BINANCE_API_SECRET` | HMAC secret for signed endpoints | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `UPSTREAM_TIMEOUT_SECS` | Outbound request timeout, `0` disables it | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `APP_ENV` | Environment label printed at startup | `development` |
//!
//! The upstream base URL is deliberately not configurable; see
//! [`BINANCE_FUTURES_BASE_URL`].

use std::time::Duration;

/// Base URL of the Binance USD-M futures REST API.
pub const BINANCE_FUTURES_BASE_URL: &str = "https://fapi.binance.com";

/// Environment variable name for the Binance API key.
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";

/// Environment variable name for the Binance API secret.
///
/// The secret is only ever used as the HMAC key and is never sent upstream.
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const APP_ENV_ENV: &str = "APP_ENV";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
pub const DEFAULT_APP_ENV: &str = "development";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// Server-level settings, everything except credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` means the outbound client waits indefinitely.
    pub upstream_timeout: Option<Duration>,
    pub log_format: LogFormat,
    pub app_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upstream_timeout: Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)),
            log_format: LogFormat::default(),
            app_env: DEFAULT_APP_ENV.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| invalid(PORT_ENV, &raw))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get(UPSTREAM_TIMEOUT_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| invalid(UPSTREAM_TIMEOUT_ENV, &raw))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| invalid(LOG_FORMAT_ENV, &raw))?,
            None => LogFormat::default(),
        };

        let app_env = get(APP_ENV_ENV).unwrap_or_else(|| DEFAULT_APP_ENV.to_string());

        Ok(Self {
            host,
            port,
            upstream_timeout,
            log_format,
            app_env,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(var: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
    }
}
