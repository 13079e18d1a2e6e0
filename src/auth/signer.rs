// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC-SHA256 request signing for Binance signed endpoints.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the digest. Appended after signing.
pub const SIGNATURE_PARAM: &str = "signature";
pub const TIMESTAMP_PARAM: &str = "timestamp";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("API secret is empty")]
    EmptySecret,

    #[error("API secret cannot be used as an HMAC key")]
    InvalidKey,
}

/// Signs canonical query strings with the API secret.
#[derive(Clone)]
pub struct RequestSigner {
    mac: HmacSha256,
}

impl RequestSigner {
    /// Key a signer with `secret`.
    ///
    /// An empty secret is a configuration error: a digest keyed by nothing
    /// would be rejected upstream anyway, so it is refused here.
    pub fn new(secret: &str) -> Result<Self, SigningError> {
        if secret.trim().is_empty() {
            return Err(SigningError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| SigningError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Lowercase hex HMAC-SHA256 of `message`. Always 64 characters.
    pub fn sign(&self, message: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Build a signed query string.
    ///
    /// `params` keep their order, `timestamp` is appended last, the whole
    /// string is signed and `&signature=<hex>` is appended.
    pub fn signed_query(&self, params: &[(&str, &str)], timestamp_ms: i64) -> String {
        let mut parts: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        parts.push(format!("{TIMESTAMP_PARAM}={timestamp_ms}"));

        let query = parts.join("&");
        let signature = self.sign(&query);
        format!("{query}&{SIGNATURE_PARAM}={signature}")
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RequestSigner { .. }")
    }
}
