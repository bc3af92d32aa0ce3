// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthGate, KeyStore, PublicPaths, TokenCodec};
use crate::config::DEFAULT_TOKEN_LIFETIME_SECS;
use crate::store::InMemoryUserStore;

/// Login behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSettings {
    /// Token and cookie lifetime
    pub token_ttl: Duration,
    /// Set the `Secure` attribute on the `jwt` cookie
    pub cookie_secure: bool,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS),
            cookie_secure: false,
        }
    }
}

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub users: Arc<InMemoryUserStore>,
    pub keys: Arc<KeyStore>,
    pub login: LoginSettings,
}

impl AppState {
    pub fn new(codec: TokenCodec, users: InMemoryUserStore, keys: KeyStore) -> Self {
        Self {
            codec: Arc::new(codec),
            users: Arc::new(users),
            keys: Arc::new(keys),
            login: LoginSettings::default(),
        }
    }

    pub fn with_login_settings(mut self, login: LoginSettings) -> Self {
        self.login = login;
        self
    }

    /// Gate sharing this state's codec.
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(Arc::clone(&self.codec), PublicPaths::default())
    }
}
