// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated identity representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Authenticated user information derived from a verified token.
///
/// Built fresh on every request by the authentication middleware and stored
/// in request extensions. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical username (token `iss` claim)
    pub subject: String,

    /// Granted roles, without duplicates
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    /// Create an identity, dropping duplicate roles but keeping first-seen
    /// order.
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        let mut unique = Vec::new();
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self {
            subject: subject.into(),
            roles: unique,
        }
    }

    /// Check if any granted role covers the required one.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.has_privilege(required))
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}
