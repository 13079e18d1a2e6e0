// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upstream exchange integrations.

pub mod binance;

pub use binance::{BinanceFuturesClient, RelayError};
