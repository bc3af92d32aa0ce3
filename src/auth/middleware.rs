// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs once per request before any handler:
//!
//! 1. Public paths (login, static assets, health probes, API docs) bypass
//!    authentication entirely.
//! 2. The token is taken from `Authorization: Bearer <token>`, or, when that
//!    header is absent, from the `jwt` cookie.
//! 3. The token is verified with the [`TokenCodec`].
//! 4. Subject and roles are decoded into an [`AuthenticatedUser`] stored in
//!    request extensions, unless one is already there.
//!
//! Any failure short-circuits with `401 Unauthorized`; the handler is never
//! invoked. The outcome of a request is computed as a [`GateDecision`] before
//! being turned into a response, so no verification error can leak past this
//! layer.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Extensions, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::{AuthError, AuthenticatedUser, TokenCodec};

/// Name of the cookie carrying the token for browser clients.
pub const TOKEN_COOKIE: &str = "jwt";

const BEARER_PREFIX: &str = "Bearer ";

/// Paths that skip authentication.
///
/// An entry matches the path itself and anything below it on a segment
/// boundary: `/css` matches `/css` and `/css/site.css` but not `/cssx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    entries: Vec<String>,
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new([
            "/login",
            "/auth/login",
            "/auth/get_token",
            "/health",
            "/metrics",
            "/css",
            "/js",
            "/static",
            "/favicon.ico",
            "/docs",
            "/api-doc",
        ])
    }
}

impl PublicPaths {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| {
                    let entry: String = entry.into();
                    match entry.trim_end_matches('/') {
                        "" => "/".to_string(),
                        trimmed => trimmed.to_string(),
                    }
                })
                .collect(),
        }
    }

    /// Check whether a request path bypasses authentication.
    pub fn is_public(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry == "/"
                || path == entry.as_str()
                || path
                    .strip_prefix(entry.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public path; proceeds unauthenticated
    Bypass,
    /// Token verified, but the request already carried an identity
    AlreadyAuthenticated,
    /// Token verified and a fresh identity derived from it
    Established(AuthenticatedUser),
}

/// The per-request authentication gate.
///
/// Cheap to clone; holds only shared read-only state.
#[derive(Clone)]
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    public_paths: Arc<PublicPaths>,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>, public_paths: PublicPaths) -> Self {
        Self {
            codec,
            public_paths: Arc::new(public_paths),
        }
    }

    /// Decide what to do with a request without mutating it.
    pub fn evaluate(
        &self,
        path: &str,
        headers: &HeaderMap,
        extensions: &Extensions,
    ) -> Result<GateDecision, AuthError> {
        if self.public_paths.is_public(path) {
            return Ok(GateDecision::Bypass);
        }

        let token = extract_token(headers)?;
        self.codec.validate(&token)?;

        if extensions.get::<AuthenticatedUser>().is_some() {
            tracing::debug!(path, "Identity already established, skipping");
            return Ok(GateDecision::AlreadyAuthenticated);
        }

        let subject = self.codec.subject_of(&token)?;
        let roles = self.codec.roles_of(&token)?;
        Ok(GateDecision::Established(AuthenticatedUser::new(subject, roles)))
    }

    /// Evaluate a request and, on success, store the identity in its
    /// extensions.
    pub fn authenticate(&self, request: &mut Request) -> Result<GateDecision, AuthError> {
        let decision = self.evaluate(request.uri().path(), request.headers(), request.extensions())?;
        if let GateDecision::Established(user) = &decision {
            request.extensions_mut().insert(user.clone());
        }
        Ok(decision)
    }
}

/// Pull the raw token out of the request.
///
/// The Authorization header wins when present and non-empty; it must then be
/// exactly `Bearer <token>`. Otherwise the `jwt` cookie is used.
pub fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MalformedCredentials)?;
        if !value.is_empty() {
            let token = value
                .strip_prefix(BEARER_PREFIX)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or(AuthError::MalformedCredentials)?;
            return Ok(token.to_string());
        }
    }

    let jar = CookieJar::from_headers(headers);
    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AuthError::MissingCredentials)
}

/// Authentication middleware function.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/v1/users/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(gate, require_auth));
/// ```
pub async fn require_auth(State(gate): State<AuthGate>, mut request: Request, next: Next) -> Response {
    match gate.authenticate(&mut request) {
        Ok(_) => next.run(request).await,
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = e.reason(),
                "Rejected request"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenError};
    use crate::testutil;
    use axum::http::{header::COOKIE, HeaderName, HeaderValue};
    use chrono::Utc;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn gate() -> AuthGate {
        AuthGate::new(testutil::shared_codec(), PublicPaths::default())
    }

    type Pair = (HeaderName, String);

    fn pair(name: HeaderName, value: impl Into<String>) -> Pair {
        (name, value.into())
    }

    fn bearer(token: &str) -> Pair {
        pair(AUTHORIZATION, format!("Bearer {token}"))
    }

    fn cookie(token: &str) -> Pair {
        pair(COOKIE, format!("jwt={token}"))
    }

    fn headers(pairs: &[Pair]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn request(path: &str, pairs: &[Pair]) -> Request {
        let mut builder = Request::builder().uri(path);
        for (name, value) in pairs {
            builder = builder.header(name.clone(), value.as_str());
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn public_paths_match_on_segment_boundaries() {
        let paths = PublicPaths::default();
        assert!(paths.is_public("/auth/login"));
        assert!(paths.is_public("/login"));
        assert!(paths.is_public("/health"));
        assert!(paths.is_public("/health/ready"));
        assert!(paths.is_public("/css/site.css"));
        assert!(paths.is_public("/docs/index.html"));
        assert!(!paths.is_public("/cssx"));
        assert!(!paths.is_public("/auth/loginx"));
        assert!(!paths.is_public("/v1/users/me"));
        assert!(!paths.is_public("/"));
    }

    #[test]
    fn public_paths_normalize_trailing_slash() {
        let paths = PublicPaths::new(["/assets/", "/robots.txt"]);
        assert!(paths.is_public("/assets"));
        assert!(paths.is_public("/assets/logo.png"));
        assert!(paths.is_public("/robots.txt"));
        assert!(!paths.is_public("/auth/login"));
    }

    #[test]
    fn extract_prefers_bearer_header() {
        let map = headers(&[bearer("abc.def.ghi"), cookie("cookie.token.x")]);
        assert_eq!(extract_token(&map).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn extract_rejects_wrong_scheme() {
        for value in ["BearerXYZ", "Basic dXNlcjpwYXNz", "bearer abc", "Bearer ", "Bearer    "] {
            let map = headers(&[pair(AUTHORIZATION, value)]);
            assert_eq!(
                extract_token(&map),
                Err(AuthError::MalformedCredentials),
                "header {value:?}"
            );
        }
    }

    #[test]
    fn extract_falls_back_to_cookie() {
        let map = headers(&[pair(COOKIE, "theme=dark; jwt=cookie.token.x")]);
        assert_eq!(extract_token(&map).unwrap(), "cookie.token.x");
    }

    #[test]
    fn extract_treats_empty_header_as_absent() {
        let map = headers(&[pair(AUTHORIZATION, ""), cookie("cookie.token.x")]);
        assert_eq!(extract_token(&map).unwrap(), "cookie.token.x");
    }

    #[test]
    fn extract_without_any_credential() {
        assert_eq!(
            extract_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
        let map = headers(&[pair(COOKIE, "session=abc; jwt=")]);
        assert_eq!(extract_token(&map), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn public_path_bypasses_without_credentials() {
        let gate = gate();
        let decision = gate
            .evaluate("/auth/login", &HeaderMap::new(), &Extensions::new())
            .unwrap();
        assert_eq!(decision, GateDecision::Bypass);
    }

    #[test]
    fn valid_token_establishes_identity() {
        let gate = gate();
        let token = testutil::codec()
            .issue("alice", &[Role::User, Role::Admin], HOUR)
            .unwrap();
        let mut req = request("/v1/users/me", &[bearer(&token)]);

        let decision = gate.authenticate(&mut req).unwrap();
        let expected = AuthenticatedUser::new("alice", [Role::User, Role::Admin]);
        assert_eq!(decision, GateDecision::Established(expected.clone()));
        assert_eq!(req.extensions().get::<AuthenticatedUser>(), Some(&expected));
    }

    #[test]
    fn establish_is_idempotent() {
        let gate = gate();
        let token = testutil::codec().issue("alice", &[Role::User], HOUR).unwrap();
        let mut req = request("/v1/users/me", &[bearer(&token)]);

        let existing = AuthenticatedUser::new("upstream", [Role::Admin]);
        req.extensions_mut().insert(existing.clone());

        assert_eq!(
            gate.authenticate(&mut req).unwrap(),
            GateDecision::AlreadyAuthenticated
        );
        assert_eq!(
            gate.authenticate(&mut req).unwrap(),
            GateDecision::AlreadyAuthenticated
        );
        assert_eq!(req.extensions().get::<AuthenticatedUser>(), Some(&existing));
    }

    #[test]
    fn second_pass_keeps_first_identity() {
        let gate = gate();
        let token = testutil::codec().issue("alice", &[Role::User], HOUR).unwrap();
        let mut req = request("/user/profile", &[cookie(&token)]);

        assert!(matches!(
            gate.authenticate(&mut req).unwrap(),
            GateDecision::Established(_)
        ));
        assert_eq!(
            gate.authenticate(&mut req).unwrap(),
            GateDecision::AlreadyAuthenticated
        );
        assert_eq!(
            req.extensions().get::<AuthenticatedUser>().map(|u| u.subject.as_str()),
            Some("alice")
        );
    }

    #[test]
    fn expired_cookie_token_is_rejected() {
        let gate = gate();
        let token = testutil::codec()
            .issue_at("alice", &[Role::User], Utc::now().timestamp() - 7200, HOUR)
            .unwrap();
        let mut req = request("/v1/users/me", &[cookie(&token)]);

        assert_eq!(
            gate.authenticate(&mut req),
            Err(AuthError::InvalidToken(TokenError::Expired))
        );
        assert!(req.extensions().get::<AuthenticatedUser>().is_none());
    }

    #[test]
    fn foreign_token_is_rejected() {
        let gate = gate();
        let token = testutil::foreign_codec()
            .issue("mallory", &[Role::Admin], HOUR)
            .unwrap();
        let mut req = request("/v1/admin/users", &[bearer(&token)]);

        assert_eq!(
            gate.authenticate(&mut req),
            Err(AuthError::InvalidToken(TokenError::InvalidSignature))
        );
    }

    #[test]
    fn malformed_header_does_not_fall_back_to_cookie() {
        let gate = gate();
        let token = testutil::codec().issue("alice", &[Role::User], HOUR).unwrap();
        let mut req = request(
            "/v1/users/me",
            &[pair(AUTHORIZATION, "Token abc"), cookie(&token)],
        );

        assert_eq!(
            gate.authenticate(&mut req),
            Err(AuthError::MalformedCredentials)
        );
    }
}
