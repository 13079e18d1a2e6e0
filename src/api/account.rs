// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed account endpoints.

use axum::{extract::State, Json};
use serde_json::Value;

use super::RelayJson;
use crate::{error::ApiError, models::ErrorEnvelope, state::AppState};

const ACCOUNT_ERROR: &str = "Failed to fetch account data";
const POSITIONS_ERROR: &str = "Failed to fetch positions";

/// Relay the futures account snapshot.
#[utoipa::path(
    get,
    path = "/account",
    tag = "Account",
    responses(
        (status = 200, description = "Account snapshot, relayed unmodified"),
        (status = 500, description = "Upstream call failed", body = ErrorEnvelope)
    )
)]
pub async fn get_account(State(state): State<AppState>) -> Result<RelayJson, ApiError> {
    state
        .client
        .account()
        .await
        .map(RelayJson)
        .map_err(|e| ApiError::relay(ACCOUNT_ERROR, e))
}

/// Relay open positions only.
///
/// Rows with a `positionAmt` of zero are dropped; the rest keep upstream order.
#[utoipa::path(
    get,
    path = "/positions",
    tag = "Account",
    responses(
        (status = 200, description = "Positions with a non-zero amount"),
        (status = 500, description = "Upstream call failed", body = ErrorEnvelope)
    )
)]
pub async fn get_positions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .client
        .open_positions()
        .await
        .map(Json)
        .map_err(|e| ApiError::relay(POSITIONS_ERROR, e))
}
