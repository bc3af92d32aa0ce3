// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user directory.
//!
//! Holds accounts with Argon2id password hashes and serves as the
//! [`CredentialVerifier`] for login. Accounts are seeded at startup; the
//! directory is read-only while serving.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{CredentialError, CredentialVerifier, Role, VerifiedUser};

/// A stored account.
#[derive(Debug, Clone)]
struct StoredUser {
    username: String,
    email: Option<String>,
    password_hash: String,
    role: Role,
}

/// Public view of an account (no password material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

/// Errors when adding accounts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user already exists: {0}")]
    AlreadyExists(String),

    #[error("failed to hash password: {0}")]
    Hash(String),
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: BTreeMap<String, StoredUser>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, hashing the password.
    pub fn add_user(
        &mut self,
        username: &str,
        password: &str,
        email: Option<String>,
        role: Role,
    ) -> Result<(), StoreError> {
        if self.users.contains_key(username) {
            return Err(StoreError::AlreadyExists(username.to_string()));
        }
        let password_hash =
            hash_password(password).map_err(|e| StoreError::Hash(e.to_string()))?;
        self.users.insert(
            username.to_string(),
            StoredUser {
                username: username.to_string(),
                email,
                password_hash,
                role,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// All accounts, ordered by username.
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.users
            .values()
            .map(|user| UserSummary {
                username: user.username.clone(),
                email: user.email.clone(),
                role: user.role,
            })
            .collect()
    }
}

/// Hash checked when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("projectdesk-unknown-account").ok())
        .as_deref()
}

impl CredentialVerifier for InMemoryUserStore {
    fn verify(&self, username: &str, password: &str) -> Result<VerifiedUser, CredentialError> {
        let Some(user) = self.users.get(username) else {
            if let Some(hash) = dummy_hash() {
                let _ = verify_password(password, hash);
            }
            return Err(CredentialError::UnknownUser);
        };

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        if !matches {
            return Err(CredentialError::BadPassword);
        }

        Ok(VerifiedUser {
            username: user.username.clone(),
            roles: vec![user.role],
        })
    }
}
