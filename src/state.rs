// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::providers::BinanceFuturesClient;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BinanceFuturesClient>,
}

impl AppState {
    pub fn new(client: BinanceFuturesClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}
