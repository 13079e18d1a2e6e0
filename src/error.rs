// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::{models::ErrorEnvelope, providers::RelayError};

/// Uniform error envelope returned by every relay route.
///
/// Always answered with 500, whatever the upstream status was.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Value) -> Self {
        Self {
            status,
            error: error.into(),
            details,
        }
    }

    pub fn internal(error: impl Into<String>, details: Value) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, details)
    }

    /// Wrap a failed upstream call. `context` is the fixed, human-readable
    /// description of what the route was doing.
    pub fn relay(context: &str, err: RelayError) -> Self {
        warn!(
            context = %context,
            upstream_status = err.upstream_status().map(|s| s.as_u16()),
            error = %err,
            "Upstream relay failed"
        );
        Self::internal(context, err.details())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorEnvelope {
            error: self.error,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
