// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::IndexResponse;

/// Describe the available routes. Never touches the upstream.
#[utoipa::path(
    get,
    path = "/",
    tag = "Index",
    responses((status = 200, description = "Route overview", body = IndexResponse))
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse::describe())
}
