// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the identity established by [`require_auth`].
//!
//! The extractors only read what the middleware stored in request
//! extensions; they never look at tokens themselves.
//!
//! ```rust,ignore
//! async fn profile(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! [`require_auth`]: super::require_auth

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedUser, Role};

/// Extractor for authenticated users.
///
/// Rejects with `401` when no identity is present, which only happens when a
/// handler is mounted on a public path or outside the middleware.
pub struct Auth(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::debug!(subject = %user.subject, "Admin route refused");
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Extractor that requires the user role.
///
/// Admins pass as well, since the admin role carries every privilege. A
/// token with no recognized roles is refused with `403`.
pub struct UserOnly(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for UserOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.has_role(Role::User) {
            tracing::debug!(subject = %user.subject, "User route refused");
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(UserOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, Request};

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    #[tokio::test]
    async fn auth_reads_identity_from_extensions() {
        let user = AuthenticatedUser::new("alice", [Role::User]);
        let mut parts = parts_with(Some(user.clone()));

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, user);
    }

    #[tokio::test]
    async fn auth_never_looks_at_headers() {
        let mut parts = Request::builder()
            .uri("/test")
            .header(AUTHORIZATION, "Bearer whatever")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let mut parts = parts_with(Some(AuthenticatedUser::new("alice", [Role::User])));

        let result = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let mut parts = parts_with(Some(AuthenticatedUser::new("root", [Role::Admin])));

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.subject, "root");
    }

    #[tokio::test]
    async fn user_only_accepts_users_and_admins() {
        for role in [Role::User, Role::Admin] {
            let mut parts = parts_with(Some(AuthenticatedUser::new("alice", [role])));
            let UserOnly(user) = UserOnly::from_request_parts(&mut parts, &()).await.unwrap();
            assert_eq!(user.subject, "alice");
        }
    }

    #[tokio::test]
    async fn user_only_rejects_identity_without_roles() {
        let mut parts = parts_with(Some(AuthenticatedUser::new("ghost", [])));

        let result = UserOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn user_only_requires_identity() {
        let mut parts = parts_with(None);

        let result = UserOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }
}
