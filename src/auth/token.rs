// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 token issuance and verification.
//!
//! Tokens use compact JWT serialization. The payload carries:
//!
//! | Claim   | Meaning                                   |
//! |---------|-------------------------------------------|
//! | `iss`   | Subject (username) the token was issued to |
//! | `roles` | Ordered list of role authority strings    |
//! | `iat`   | Issued-at, epoch seconds                  |
//! | `exp`   | Expiry, epoch seconds                     |
//!
//! There is no revocation list; expiry is the only way a token stops being
//! accepted.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use serde::{Deserialize, Serialize};

use super::keys::{KeyError, KeyPair};
use super::roles::Role;

/// Default clock skew tolerance on `exp`.
pub const DEFAULT_LEEWAY_SECS: u64 = 0;

/// Claims written into every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject the token was issued to
    pub iss: String,
    /// Granted roles, in issuance order
    pub roles: Vec<Role>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Lenient view of a token payload for the decode-only path.
///
/// `roles` is kept untyped so a missing or odd-shaped claim degrades to no
/// roles instead of failing the decode.
#[derive(Debug, Clone, Deserialize)]
struct RawClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    roles: serde_json::Value,
}

/// Token verification and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token has no issuer claim")]
    MissingSubject,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Issues and verifies RS256 tokens with a fixed key pair.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec around a loaded key pair.
    pub fn new(keys: &KeyPair) -> Result<Self, KeyError> {
        let private_der = keys.private_key().to_pkcs1_der()?;
        let public_der = keys.public_key().to_pkcs1_der()?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = DEFAULT_LEEWAY_SECS;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_rsa_der(private_der.as_bytes()),
            decoding_key: DecodingKey::from_rsa_der(public_der.as_bytes()),
            validation,
        })
    }

    /// Set the clock skew tolerance applied to `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.validation.leeway = leeway_secs;
        self
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &str, roles: &[Role], ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, roles, Utc::now().timestamp(), ttl)
    }

    /// Issue a token with an explicit issued-at time (epoch seconds).
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[Role],
        issued_at: i64,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            iss: subject.to_string(),
            roles: roles.to_vec(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm and expiry.
    pub fn validate(&self, token: &str) -> Result<(), TokenError> {
        decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(())
    }

    /// Boolean form of [`validate`](Self::validate).
    pub fn is_valid(&self, token: &str) -> bool {
        self.validate(token).is_ok()
    }

    /// Subject (`iss`) of a token.
    ///
    /// Decode only: the signature is NOT checked. Call
    /// [`validate`](Self::validate) first when the result must be trusted.
    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        decode_unverified(token)?
            .iss
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::MissingSubject)
    }

    /// Roles of a token, in claim order.
    ///
    /// Decode only, like [`subject_of`](Self::subject_of). A missing or
    /// non-list claim yields no roles; unknown entries are dropped.
    pub fn roles_of(&self, token: &str) -> Result<Vec<Role>, TokenError> {
        Ok(roles_from_claim(&decode_unverified(token)?.roles))
    }
}

fn decode_unverified(token: &str) -> Result<RawClaims, TokenError> {
    let data = jsonwebtoken::dangerous::insecure_decode::<RawClaims>(token)?;
    Ok(data.claims)
}

fn roles_from_claim(value: &serde_json::Value) -> Vec<Role> {
    let Some(entries) = value.as_array() else {
        if !value.is_null() {
            tracing::debug!("roles claim is not a list, treating as no roles");
        }
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let role = entry.as_str().and_then(Role::from_str);
            if role.is_none() {
                tracing::debug!(entry = %entry, "dropping unrecognized role");
            }
            role
        })
        .collect()
}
