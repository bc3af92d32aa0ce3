// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Authentication error type.
///
/// Variants keep the precise cause for logging. The HTTP response does not:
/// every authentication failure is rendered as a bare `401 Unauthorized` so
/// clients cannot tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither an Authorization header nor a `jwt` cookie was present
    MissingCredentials,
    /// Authorization header present but not `Bearer <token>`
    MalformedCredentials,
    /// Token failed verification (expired, bad signature, garbled)
    InvalidToken(TokenError),
    /// Username/password rejected at login
    BadCredentials,
    /// Authenticated, but the role does not allow this operation
    InsufficientPermissions,
    /// Internal error
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Short machine-readable cause, for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "no credential presented",
            AuthError::MalformedCredentials => "malformed authorization header",
            AuthError::InvalidToken(TokenError::Expired) => "expired token",
            AuthError::InvalidToken(_) => "invalid token",
            AuthError::BadCredentials => "bad credentials",
            AuthError::InsufficientPermissions => "insufficient permissions",
            AuthError::Internal(_) => "internal error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::MalformedCredentials
            | AuthError::InvalidToken(_)
            | AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "No credential presented"),
            AuthError::MalformedCredentials => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken(e) => write!(f, "Invalid or expired token: {e}"),
            AuthError::BadCredentials => write!(f, "Invalid username or password"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::InvalidToken(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match status {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            _ => "Internal server error",
        };
        (status, Json(AuthErrorBody { error })).into_response()
    }
}
