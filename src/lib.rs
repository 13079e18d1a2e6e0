// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Binance Futures Relay
//!
//! A thin HTTP relay in front of the Binance USD-M futures REST API. Private
//! lookups are signed with HMAC-SHA256 using credentials loaded at startup;
//! public market data is forwarded unsigned.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - API credentials and request signing
//! - `providers` - Upstream exchange client
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
