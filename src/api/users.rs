// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AuthenticatedUser, Role, UserOnly};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Canonical username
    pub subject: String,
    /// Granted roles
    pub roles: Vec<Role>,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            subject: user.subject,
            roles: user.roles,
        }
    }
}

/// Get the current authenticated user's information.
///
/// This endpoint returns the identity and roles of the currently authenticated user.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Forbidden - user role required"),
    )
)]
pub async fn get_current_user(UserOnly(user): UserOnly) -> Json<UserMeResponse> {
    Json(user.into())
}

/// Landing page for regular users after login.
#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Forbidden - user role required"),
    )
)]
pub async fn profile(auth: UserOnly) -> Json<UserMeResponse> {
    get_current_user(auth).await
}
