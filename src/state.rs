// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{SessionCookie, TokenService};
use crate::storage::EmcDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<EmcDatabase>,
    pub tokens: TokenService,
    pub cookie: SessionCookie,
}

impl AppState {
    pub fn new(db: EmcDatabase, tokens: TokenService, cookie: SessionCookie) -> Self {
        Self {
            db: Arc::new(db),
            tokens,
            cookie,
        }
    }
}
