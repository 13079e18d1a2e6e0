// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test helpers: a local fake exchange on an ephemeral port.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

use crate::{
    auth::{ApiCredentials, API_KEY_HEADER},
    providers::BinanceFuturesClient,
    state::AppState,
};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_SECRET: &str = "test-api-secret";

/// What the fake exchange saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

#[derive(Clone, Default)]
struct Canned {
    responses: Arc<HashMap<String, (StatusCode, String)>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

pub struct FakeUpstream {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Default)]
pub struct FakeUpstreamBuilder {
    responses: HashMap<String, (StatusCode, String)>,
    delay: Option<Duration>,
}

impl FakeUpstream {
    pub fn builder() -> FakeUpstreamBuilder {
        FakeUpstreamBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

impl FakeUpstreamBuilder {
    pub fn respond(mut self, path: &str, status: StatusCode, body: impl Into<String>) -> Self {
        self.responses
            .insert(path.to_string(), (status, body.into()));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn spawn(self) -> FakeUpstream {
        let canned = Canned {
            responses: Arc::new(self.responses),
            recorded: Arc::default(),
            delay: self.delay,
        };
        let recorded = Arc::clone(&canned.recorded);

        let app = Router::new().fallback(respond).with_state(canned);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeUpstream {
            base_url: format!("http://{addr}"),
            recorded,
        }
    }
}

async fn respond(State(canned): State<Canned>, uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    canned.recorded.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        api_key: headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    let (status, body) = canned
        .responses
        .get(uri.path())
        .cloned()
        .unwrap_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                r#"{"code":-1,"msg":"unknown path"}"#.to_string(),
            )
        });
    (status, [(CONTENT_TYPE, "application/json")], body)
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_client(base_url: &str) -> BinanceFuturesClient {
    BinanceFuturesClient::new(
        base_url,
        ApiCredentials::new(TEST_API_KEY, TEST_SECRET),
        Some(Duration::from_secs(5)),
    )
    .unwrap()
}

pub fn test_state(base_url: &str) -> AppState {
    AppState::new(test_client(base_url))
}
