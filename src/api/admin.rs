// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints.
//!
//! These endpoints require the Admin role.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{auth::AdminOnly, state::AppState, store::UserSummary};

/// Response for the admin user list.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// All accounts, ordered by username.
    pub users: Vec<UserSummary>,
    /// Total number of accounts.
    pub total: usize,
}

/// List all user accounts.
#[utoipa::path(
    get,
    path = "/v1/admin/users",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User accounts", body = UserListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Forbidden - admin role required"),
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Json<UserListResponse> {
    let users = state.users.list_users();
    tracing::debug!(admin = %admin.subject, count = users.len(), "Listed users");
    Json(UserListResponse {
        total: users.len(),
        users,
    })
}
