// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Upstream Authentication
//!
//! Binance signed endpoints (`USER_DATA`) need two things on every request:
//!
//! 1. The API key in the `X-MBX-APIKEY` header.
//! 2. A `signature` query parameter: the HMAC-SHA256 of the full query
//!    string (ending in a fresh millisecond `timestamp`) keyed by the secret.
//!
//! The secret never leaves the process.

pub mod credentials;
pub mod signer;

pub use credentials::ApiCredentials;
pub use signer::{RequestSigner, SigningError};

/// Header carrying the API key on signed requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";
