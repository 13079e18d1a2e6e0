// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Binance API credentials.
//!
//! The secret is wrapped in [`SecretString`] so it cannot end up in logs via
//! `Debug`, and its memory is zeroed on drop.

use secrecy::{ExposeSecret, SecretString};

use crate::config::{ConfigError, API_KEY_ENV, API_SECRET_ENV};

/// API key and secret pair, loaded once at startup.
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    api_secret: SecretString,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Load credentials from `BINANCE_API_KEY` and `BINANCE_API_SECRET`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if either variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::Missing(name.to_string()))
        };

        Ok(Self::new(required(API_KEY_ENV)?, required(API_SECRET_ENV)?))
    }

    /// The API key. Sent as a header, never as a query parameter.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret for HMAC keying.
    ///
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
