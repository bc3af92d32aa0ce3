// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoints.
//!
//! `POST /auth/login` and its alias `POST /auth/get_token` exchange a
//! username and password for a signed token. The token is returned in the
//! body and set as an HttpOnly `jwt` cookie for browser clients.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{login as issue_token, IssuedToken, Role, TOKEN_COOKIE},
    error::{ApiError, ValidationErrors},
    state::AppState,
};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 255;

/// Where admins land after login.
pub const ADMIN_LANDING: &str = "/main";
/// Where everyone else lands after login.
pub const USER_LANDING: &str = "/user/profile";

/// Login request body.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(min_length = 3, max_length = 100)]
    pub user_name: String,
    #[serde(default)]
    #[schema(min_length = 6, max_length = 255)]
    pub password: String,
}

impl LoginRequest {
    /// Check field lengths, reporting every violation.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_field(
            &mut errors,
            "userName",
            &self.user_name,
            USERNAME_MIN_CHARS,
            USERNAME_MAX_CHARS,
        );
        check_field(
            &mut errors,
            "password",
            &self.password,
            PASSWORD_MIN_CHARS,
            PASSWORD_MAX_CHARS,
        );
        errors.into_result()
    }
}

fn check_field(errors: &mut ValidationErrors, name: &str, value: &str, min: usize, max: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be blank"));
    }
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(format!("{name} must be between {min} and {max} characters"));
    }
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed RS256 token
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
    /// Landing page for this user's role
    pub redirect: String,
}

fn landing_for(roles: &[Role]) -> &'static str {
    if roles.contains(&Role::Admin) {
        ADMIN_LANDING
    } else {
        USER_LANDING
    }
}

/// Log in with username and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued; also set as the `jwt` cookie", body = TokenResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized - bad credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(request) = payload.map_err(|rejection| {
        let mut errors = ValidationErrors::new();
        errors.push(rejection.body_text());
        errors.into_response()
    })?;
    request.validate().map_err(IntoResponse::into_response)?;

    let users = Arc::clone(&state.users);
    let codec = Arc::clone(&state.codec);
    let ttl = state.login.token_ttl;
    let issued = tokio::task::spawn_blocking(move || {
        issue_token(
            &*users,
            &codec,
            &request.user_name,
            &request.password,
            ttl,
        )
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Login task failed");
        ApiError::internal("Internal server error").into_response()
    })?
    .map_err(IntoResponse::into_response)?;

    Ok(token_response(jar, issued, state.login.cookie_secure))
}

/// Alias of [`login`] kept for token-only API clients.
#[utoipa::path(
    post,
    path = "/auth/get_token",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued; also set as the `jwt` cookie", body = TokenResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized - bad credentials"),
    )
)]
pub async fn get_token(
    state: State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, Response> {
    login(state, jar, payload).await
}

fn token_response(jar: CookieJar, issued: IssuedToken, secure: bool) -> Response {
    let expires_in = issued.ttl.as_secs();
    let redirect = landing_for(&issued.user.roles);

    let cookie = Cookie::build((TOKEN_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(expires_in).unwrap_or(i64::MAX),
        ))
        .build();

    (
        jar.add(cookie),
        [(header::LOCATION, HeaderValue::from_static(redirect))],
        Json(TokenResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in,
            redirect: redirect.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_name: &str, password: &str) -> LoginRequest {
        LoginRequest {
            user_name: user_name.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("alice", "secret1").validate().is_ok());
    }

    #[test]
    fn every_violation_is_reported() {
        let errors = request("  ", "12345").validate().unwrap_err();
        assert_eq!(
            errors.errors,
            vec![
                "userName must not be blank".to_string(),
                "userName must be between 3 and 100 characters".to_string(),
                "password must be between 6 and 255 characters".to_string(),
            ]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(request("äöü", "ßßßßßß").validate().is_ok());
        assert!(request(&"a".repeat(101), "secret1").validate().is_err());
    }

    #[test]
    fn admins_land_on_main() {
        assert_eq!(landing_for(&[Role::User, Role::Admin]), "/main");
        assert_eq!(landing_for(&[Role::User]), "/user/profile");
        assert_eq!(landing_for(&[]), "/user/profile");
    }
}
