// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Local request and response shapes. Upstream payloads are relayed as-is
//! and deliberately have no types here; the relay does not interpret them
//! beyond the `positionAmt` filter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Index
// =============================================================================

/// Static description of the available routes.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Endpoints {
    #[serde(rename = "/account")]
    pub account: String,
    #[serde(rename = "/positions")]
    pub positions: String,
    #[serde(rename = "/ticker/:symbol")]
    pub ticker: String,
    #[serde(rename = "/klines/:symbol")]
    pub klines: String,
}

impl IndexResponse {
    pub fn describe() -> Self {
        Self {
            message: "Binance Futures API Server".to_string(),
            endpoints: Endpoints {
                account: "Get account balance".to_string(),
                positions: "Get current positions".to_string(),
                ticker: "Get ticker price for symbol".to_string(),
                klines: "Get kline data for symbol".to_string(),
            },
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error body shared by every relay route.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorEnvelope {
    /// Fixed description of the failed operation.
    pub error: String,
    /// Upstream error body when available, otherwise a local message.
    #[schema(value_type = Object)]
    pub details: Value,
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the klines relay.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct KlinesQuery {
    /// Candle interval, forwarded verbatim.
    #[param(default = "1h")]
    pub interval: Option<String>,
    /// Number of candles, forwarded verbatim.
    #[param(default = "100")]
    pub limit: Option<String>,
}

impl KlinesQuery {
    /// Read `interval` and `limit` from a raw query string.
    ///
    /// Never fails: repeated keys are joined with `,` and unknown keys are
    /// ignored, leaving any rejection to the exchange.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "interval" => &mut query.interval,
                "limit" => &mut query.limit,
                _ => continue,
            };
            match slot.as_mut() {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value.into_owned()),
            }
        }
        query
    }
}
