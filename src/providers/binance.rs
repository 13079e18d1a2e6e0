// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Binance USD-M futures REST client.
//!
//! Every call is a single GET with no retry. Successful bodies are returned
//! as raw bytes so they can be relayed unmodified; only the positions lookup
//! is parsed, to drop flat positions.

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::{ApiCredentials, RequestSigner, API_KEY_HEADER};

pub const ACCOUNT_PATH: &str = "/fapi/v2/account";
pub const POSITION_RISK_PATH: &str = "/fapi/v2/positionRisk";
pub const TICKER_24HR_PATH: &str = "/fapi/v1/ticker/24hr";
pub const KLINES_PATH: &str = "/fapi/v1/klines";

pub const DEFAULT_KLINE_INTERVAL: &str = "1h";
pub const DEFAULT_KLINE_LIMIT: &str = "100";

const POSITION_AMOUNT_FIELD: &str = "positionAmt";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay configuration invalid: {0}")]
    Config(String),

    #[error("{0}")]
    Transport(String),

    #[error("upstream returned {status}")]
    Upstream {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("upstream response was invalid: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    /// Detail payload for the error envelope.
    ///
    /// The upstream error body when there is one, otherwise the local message.
    pub fn details(&self) -> Value {
        match self {
            RelayError::Upstream {
                body: Some(body), ..
            } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }

    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            RelayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct BinanceFuturesClient {
    base_url: Url,
    credentials: ApiCredentials,
    signer: RequestSigner,
    http: Client,
}

impl BinanceFuturesClient {
    /// Build a client against `base_url`.
    ///
    /// `timeout` of `None` leaves outbound requests unbounded.
    pub fn new(
        base_url: &str,
        credentials: ApiCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self, RelayError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RelayError::Config(format!("invalid base URL {base_url}: {e}")))?;
        let signer = RequestSigner::new(credentials.expose_secret())
            .map_err(|e| RelayError::Config(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            credentials,
            signer,
            http,
        })
    }

    /// Account balances and margin snapshot (`USER_DATA`).
    pub async fn account(&self) -> Result<Bytes, RelayError> {
        self.signed_get(ACCOUNT_PATH).await
    }

    /// Every position row reported by the exchange, flat ones included.
    pub async fn position_risk(&self) -> Result<Value, RelayError> {
        let body = self.signed_get(POSITION_RISK_PATH).await?;
        serde_json::from_slice(&body).map_err(|e| {
            RelayError::InvalidResponse(format!("GET {POSITION_RISK_PATH} invalid JSON: {e}"))
        })
    }

    /// Positions with a non-zero amount, in upstream order.
    pub async fn open_positions(&self) -> Result<Value, RelayError> {
        open_positions(self.position_risk().await?)
    }

    pub async fn ticker_24hr(&self, symbol: &str) -> Result<Bytes, RelayError> {
        let symbol = symbol.to_uppercase();
        self.public_get(TICKER_24HR_PATH, &[("symbol", symbol.as_str())])
            .await
    }

    /// Candlesticks for `symbol`, with `1h` / `100` defaults.
    ///
    /// `interval` and `limit` are forwarded verbatim; the exchange validates them.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Bytes, RelayError> {
        let symbol = symbol.to_uppercase();
        let interval = interval.unwrap_or(DEFAULT_KLINE_INTERVAL);
        let limit = limit.unwrap_or(DEFAULT_KLINE_LIMIT);
        self.public_get(
            KLINES_PATH,
            &[("symbol", symbol.as_str()), ("interval", interval), ("limit", limit)],
        )
        .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, RelayError> {
        self.base_url
            .join(path)
            .map_err(|e| RelayError::Config(format!("invalid endpoint {path}: {e}")))
    }

    async fn signed_get(&self, path: &str) -> Result<Bytes, RelayError> {
        let mut url = self.endpoint(path)?;
        // Timestamp must be taken right before signing.
        let timestamp = Utc::now().timestamp_millis();
        let query = self.signer.signed_query(&[], timestamp);
        url.set_query(Some(&query));

        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.credentials.api_key());
        self.execute(path, request).await
    }

    async fn public_get(&self, path: &str, params: &[(&str, &str)]) -> Result<Bytes, RelayError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(params);
        self.execute(path, self.http.get(url)).await
    }

    /// Send `request` once and hand back the raw body.
    ///
    /// A 2xx body that is not JSON is reported as `InvalidResponse` rather
    /// than relayed, so callers only ever receive JSON.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Bytes, RelayError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status,
                body: parse_error_body(&body),
            });
        }

        serde_json::from_slice::<IgnoredAny>(&body).map_err(|e| {
            RelayError::InvalidResponse(format!("GET {path} invalid JSON: {e}"))
        })?;

        debug!(
            path = %path,
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream response received"
        );
        Ok(body)
    }
}

/// Keep only positions whose amount is not exactly zero.
///
/// Amounts that are missing or do not parse are kept, since they are not
/// known to be flat.
pub fn open_positions(positions: Value) -> Result<Value, RelayError> {
    let Value::Array(entries) = positions else {
        return Err(RelayError::InvalidResponse(
            "expected a JSON array of positions".to_string(),
        ));
    };

    Ok(Value::Array(
        entries.into_iter().filter(is_open_position).collect(),
    ))
}

fn is_open_position(entry: &Value) -> bool {
    position_amount(entry).is_none_or(|amount| amount != 0.0)
}

fn position_amount(entry: &Value) -> Option<f64> {
    match entry.get(POSITION_AMOUNT_FIELD)? {
        // Strict parse: a prefix-numeric string such as "0abc" is unparseable
        // and therefore kept. Binance always sends plain decimals.
        Value::String(raw) => raw.trim().parse().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

/// Describe a transport failure with its full cause chain.
///
/// The URL is stripped first since it carries the signed query.
fn transport_error(err: reqwest::Error) -> RelayError {
    let err = err.without_url();
    let kind = if err.is_timeout() {
        "upstream request timed out"
    } else if err.is_connect() {
        "upstream connection failed"
    } else {
        "upstream request failed"
    };

    let mut message = format!("{kind}: {err}");
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    RelayError::Transport(message)
}

fn parse_error_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_client, unreachable_base_url, FakeUpstream, TEST_API_KEY, TEST_SECRET};
    use serde_json::json;

    #[test]
    fn open_positions_drops_flat_entries_and_keeps_order() {
        let upstream = json!([
            { "symbol": "BTCUSDT", "positionAmt": "0.010" },
            { "symbol": "ETHUSDT", "positionAmt": "0.000" },
            { "symbol": "SOLUSDT", "positionAmt": "-3" },
            { "symbol": "XRPUSDT", "positionAmt": "0" },
            { "symbol": "BNBUSDT", "positionAmt": "-0.0" },
            { "symbol": "ADAUSDT", "positionAmt": "12.5" }
        ]);

        let filtered = open_positions(upstream).unwrap();
        let symbols: Vec<&str> = filtered
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["symbol"].as_str().unwrap())
            .collect();

        assert_eq!(symbols, vec!["BTCUSDT", "SOLUSDT", "ADAUSDT"]);
    }

    #[test]
    fn open_positions_accepts_numeric_amounts() {
        let filtered = open_positions(json!([
            { "symbol": "A", "positionAmt": 0 },
            { "symbol": "B", "positionAmt": 1.5 }
        ]))
        .unwrap();
        assert_eq!(filtered, json!([{ "symbol": "B", "positionAmt": 1.5 }]));
    }

    #[test]
    fn open_positions_keeps_unparseable_amounts() {
        let filtered = open_positions(json!([
            { "symbol": "A" },
            { "symbol": "B", "positionAmt": "n/a" }
        ]))
        .unwrap();
        assert_eq!(filtered.as_array().unwrap().len(), 2);
    }

    #[test]
    fn open_positions_keeps_prefix_numeric_amounts() {
        let filtered = open_positions(json!([{ "symbol": "A", "positionAmt": "0abc" }])).unwrap();
        assert_eq!(filtered.as_array().unwrap().len(), 1);
    }

    #[test]
    fn open_positions_preserves_entry_field_order() {
        let filtered = open_positions(json!([
            { "symbol": "BTCUSDT", "positionAmt": "1", "entryPrice": "42000.0" }
        ]))
        .unwrap();
        assert_eq!(
            serde_json::to_string(&filtered).unwrap(),
            r#"[{"symbol":"BTCUSDT","positionAmt":"1","entryPrice":"42000.0"}]"#
        );
    }

    #[test]
    fn open_positions_rejects_non_array_payload() {
        let err = open_positions(json!({ "code": -2015 })).unwrap_err();
        assert!(matches!(err, RelayError::InvalidResponse(_)));
    }

    #[test]
    fn parse_error_body_handles_json_text_and_empty() {
        assert_eq!(
            parse_error_body(br#"{"code":-1121,"msg":"Invalid symbol."}"#),
            Some(json!({ "code": -1121, "msg": "Invalid symbol." }))
        );
        assert_eq!(
            parse_error_body(b"Bad Gateway"),
            Some(Value::String("Bad Gateway".into()))
        );
        assert_eq!(parse_error_body(b""), None);
        assert_eq!(parse_error_body(b" \n"), None);
    }

    #[test]
    fn details_prefer_upstream_body() {
        let with_body = RelayError::Upstream {
            status: StatusCode::BAD_REQUEST,
            body: Some(json!({ "code": -1121 })),
        };
        assert_eq!(with_body.details(), json!({ "code": -1121 }));
        assert_eq!(with_body.upstream_status(), Some(StatusCode::BAD_REQUEST));

        let without_body = RelayError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            body: None,
        };
        assert_eq!(
            without_body.details(),
            json!("upstream returned 502 Bad Gateway")
        );

        let transport = RelayError::Transport("connection refused".into());
        assert_eq!(transport.details(), json!("connection refused"));
        assert_eq!(transport.upstream_status(), None);
    }

    #[test]
    fn new_rejects_empty_secret() {
        let err = BinanceFuturesClient::new(
            "https://fapi.binance.com",
            ApiCredentials::new("key", ""),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let err = BinanceFuturesClient::new(
            "not a url",
            ApiCredentials::new("key", "secret"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[tokio::test]
    async fn signed_get_sends_key_header_and_verifiable_signature() {
        let upstream = FakeUpstream::builder()
            .respond(ACCOUNT_PATH, StatusCode::OK, r#"{"totalWalletBalance":"10.0"}"#)
            .spawn()
            .await;
        let client = test_client(&upstream.base_url);

        let body = client.account().await.unwrap();
        assert_eq!(&body[..], br#"{"totalWalletBalance":"10.0"}"#);

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.path, ACCOUNT_PATH);
        assert_eq!(request.api_key.as_deref(), Some(TEST_API_KEY));
        assert!(!request.query.contains(TEST_API_KEY));

        let (unsigned, signature) = request.query.split_once("&signature=").unwrap();
        assert!(unsigned.starts_with("timestamp="));
        let timestamp: i64 = unsigned["timestamp=".len()..].parse().unwrap();
        assert!((Utc::now().timestamp_millis() - timestamp).abs() < 60_000);

        let signer = RequestSigner::new(TEST_SECRET).unwrap();
        assert_eq!(signature, signer.sign(unsigned));
    }

    #[tokio::test]
    async fn public_get_does_not_sign_or_send_key() {
        let upstream = FakeUpstream::builder()
            .respond(TICKER_24HR_PATH, StatusCode::OK, r#"{"symbol":"BTCUSDT"}"#)
            .spawn()
            .await;
        let client = test_client(&upstream.base_url);

        client.ticker_24hr("btcUsdt").await.unwrap();

        let request = &upstream.requests()[0];
        assert_eq!(request.query, "symbol=BTCUSDT");
        assert_eq!(request.api_key, None);
    }

    #[tokio::test]
    async fn non_success_status_carries_upstream_body() {
        let upstream = FakeUpstream::builder()
            .respond(
                TICKER_24HR_PATH,
                StatusCode::BAD_REQUEST,
                r#"{"code":-1121,"msg":"Invalid symbol."}"#,
            )
            .spawn()
            .await;
        let client = test_client(&upstream.base_url);

        let err = client.ticker_24hr("nope").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.details(), json!({ "code": -1121, "msg": "Invalid symbol." }));
    }

    #[tokio::test]
    async fn success_with_invalid_json_is_rejected() {
        let upstream = FakeUpstream::builder()
            .respond(KLINES_PATH, StatusCode::OK, "<html>maintenance</html>")
            .spawn()
            .await;
        let client = test_client(&upstream.base_url);

        let err = client.klines("btcusdt", None, None).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let client = test_client(&unreachable_base_url().await);
        let err = client.account().await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));

        let details = err.details();
        let details = details.as_str().unwrap();
        assert!(details.starts_with("upstream connection failed: "), "{details}");
        assert!(!details.contains("signature="), "{details}");
    }

    #[tokio::test]
    async fn configured_timeout_bounds_slow_upstream() {
        let upstream = FakeUpstream::builder()
            .respond(ACCOUNT_PATH, StatusCode::OK, "{}")
            .delay(Duration::from_secs(5))
            .spawn()
            .await;
        let client = BinanceFuturesClient::new(
            &upstream.base_url,
            ApiCredentials::new(TEST_API_KEY, TEST_SECRET),
            Some(Duration::from_millis(200)),
        )
        .unwrap();

        let err = client.account().await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));

        let details = err.details();
        let details = details.as_str().unwrap();
        assert!(details.starts_with("upstream request timed out: "), "{details}");
        assert!(!details.contains("signature="), "{details}");
    }

    #[tokio::test]
    async fn refused_and_timed_out_calls_report_different_causes() {
        let refused = test_client(&unreachable_base_url().await)
            .account()
            .await
            .unwrap_err()
            .details();

        let slow = FakeUpstream::builder()
            .respond(ACCOUNT_PATH, StatusCode::OK, "{}")
            .delay(Duration::from_secs(5))
            .spawn()
            .await;
        let timed_out = BinanceFuturesClient::new(
            &slow.base_url,
            ApiCredentials::new(TEST_API_KEY, TEST_SECRET),
            Some(Duration::from_millis(200)),
        )
        .unwrap()
        .account()
        .await
        .unwrap_err()
        .details();

        assert_ne!(refused, timed_out);
    }
}
