// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ProjectDesk - Users & Projects Service
//!
//! Stateless token authentication for the ProjectDesk backend: RS256 tokens
//! signed with a key pair kept on disk, issued at login and checked by a
//! middleware on every request.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Keys, tokens, the authentication gate and login
//! - `store` - In-memory user directory

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod store;

#[cfg(test)]
mod testutil;
