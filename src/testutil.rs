// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.
//!
//! RSA key generation is slow, so each test binary generates its two key
//! pairs once and reuses them.

use std::sync::{Arc, OnceLock};

use crate::auth::{KeyPair, TokenCodec};

static KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();
static FOREIGN_KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();

/// The key pair trusted by [`codec`].
pub fn key_pair() -> &'static KeyPair {
    KEY_PAIR.get_or_init(|| KeyPair::generate().expect("generate test key pair"))
}

/// An unrelated key pair, for forged-signature cases.
pub fn foreign_key_pair() -> &'static KeyPair {
    FOREIGN_KEY_PAIR.get_or_init(|| KeyPair::generate().expect("generate foreign key pair"))
}

pub fn codec() -> TokenCodec {
    TokenCodec::new(key_pair()).expect("build test codec")
}

pub fn foreign_codec() -> TokenCodec {
    TokenCodec::new(foreign_key_pair()).expect("build foreign codec")
}

pub fn shared_codec() -> Arc<TokenCodec> {
    Arc::new(codec())
}
