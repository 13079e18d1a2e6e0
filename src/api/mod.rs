// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{Endpoints, ErrorEnvelope, IndexResponse},
    state::AppState,
};

pub mod account;
pub mod index;
pub mod market;

/// Upstream JSON body passed through byte-for-byte.
#[derive(Debug)]
pub struct RelayJson(pub Bytes);

impl IntoResponse for RelayJson {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "application/json")], self.0).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let relay_routes = Router::new()
        .route("/", get(index::index))
        .route("/account", get(account::get_account))
        .route("/positions", get(account::get_positions))
        .route("/ticker/{symbol}", get(market::get_ticker))
        .route("/klines/{symbol}", get(market::get_klines))
        .with_state(state);

    Router::new()
        .merge(relay_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index::index,
        account::get_account,
        account::get_positions,
        market::get_ticker,
        market::get_klines
    ),
    components(schemas(IndexResponse, Endpoints, ErrorEnvelope)),
    tags(
        (name = "Index", description = "Route overview"),
        (name = "Account", description = "Signed account lookups"),
        (name = "Market", description = "Public market data")
    )
)]
struct ApiDoc;
