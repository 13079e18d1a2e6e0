// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public market data endpoints. No signing, no API key.

use axum::extract::{rejection::PathRejection, Path, RawQuery, State};
use serde_json::Value;

use super::RelayJson;
use crate::{
    error::ApiError,
    models::{ErrorEnvelope, KlinesQuery},
    state::AppState,
};

const TICKER_ERROR: &str = "Failed to fetch ticker data";
const KLINES_ERROR: &str = "Failed to fetch kline data";

/// Relay 24h ticker statistics for a symbol.
#[utoipa::path(
    get,
    path = "/ticker/{symbol}",
    tag = "Market",
    params(("symbol" = String, Path, description = "Contract symbol, any case")),
    responses(
        (status = 200, description = "24h ticker, relayed unmodified"),
        (status = 500, description = "Upstream call failed", body = ErrorEnvelope)
    )
)]
pub async fn get_ticker(
    State(state): State<AppState>,
    symbol: Result<Path<String>, PathRejection>,
) -> Result<RelayJson, ApiError> {
    let Path(symbol) = symbol.map_err(|e| path_error(TICKER_ERROR, e))?;
    state
        .client
        .ticker_24hr(&symbol)
        .await
        .map(RelayJson)
        .map_err(|e| ApiError::relay(TICKER_ERROR, e))
}

/// Relay candlesticks for a symbol.
#[utoipa::path(
    get,
    path = "/klines/{symbol}",
    tag = "Market",
    params(
        ("symbol" = String, Path, description = "Contract symbol, any case"),
        KlinesQuery
    ),
    responses(
        (status = 200, description = "Kline series, relayed unmodified"),
        (status = 500, description = "Upstream call failed", body = ErrorEnvelope)
    )
)]
pub async fn get_klines(
    State(state): State<AppState>,
    symbol: Result<Path<String>, PathRejection>,
    RawQuery(raw_query): RawQuery,
) -> Result<RelayJson, ApiError> {
    let Path(symbol) = symbol.map_err(|e| path_error(KLINES_ERROR, e))?;
    let query = KlinesQuery::from_raw(raw_query.as_deref());
    state
        .client
        .klines(&symbol, query.interval.as_deref(), query.limit.as_deref())
        .await
        .map(RelayJson)
        .map_err(|e| ApiError::relay(KLINES_ERROR, e))
}

/// A symbol axum cannot decode still gets the uniform envelope.
fn path_error(context: &str, rejection: PathRejection) -> ApiError {
    ApiError::internal(context, Value::String(rejection.body_text()))
}
