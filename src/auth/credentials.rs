// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password verification and token issuance at login.
//!
//! Credential checks happen only here, never on ordinary requests; every
//! later request is authenticated by the token this step hands out.

use std::time::Duration;

use super::{AuthError, Role, TokenCodec};

/// Canonical identity returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub username: String,
    pub roles: Vec<Role>,
}

/// Credential check failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("unknown user")]
    UnknownUser,

    #[error("bad credentials")]
    BadPassword,

    #[error("credential store error: {0}")]
    Backend(String),
}

/// Verifies a username/password against stored, hashed credentials.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<VerifiedUser, CredentialError>;
}

/// A token handed out at login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user: VerifiedUser,
    pub ttl: Duration,
}

/// Check credentials and, on success, issue a token for the canonical user.
///
/// Unknown user and wrong password are reported identically.
pub fn login(
    verifier: &dyn CredentialVerifier,
    codec: &TokenCodec,
    username: &str,
    password: &str,
    ttl: Duration,
) -> Result<IssuedToken, AuthError> {
    let user = verifier.verify(username, password).map_err(|e| match e {
        CredentialError::UnknownUser | CredentialError::BadPassword => {
            tracing::info!(username = %username, "Login rejected");
            AuthError::BadCredentials
        }
        CredentialError::Backend(msg) => {
            tracing::error!(error = %msg, "Credential store failure during login");
            AuthError::Internal(msg)
        }
    })?;

    let token = codec
        .issue(&user.username, &user.roles, ttl)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    tracing::info!(username = %user.username, "Issued token");
    Ok(IssuedToken { token, user, ttl })
}
