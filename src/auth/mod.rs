// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless token authentication for the ProjectDesk API.
//!
//! ## Auth Flow
//!
//! 1. A client posts its username and password to `/auth/login`
//! 2. The server verifies them against the user directory and returns a
//!    signed RS256 token, both in the body and as an HttpOnly `jwt` cookie
//! 3. Every later request carries the token as `Authorization: Bearer <token>`
//!    or in the cookie
//! 4. [`require_auth`] verifies the token and stores an
//!    [`AuthenticatedUser`] in the request:
//!    - `iss` → canonical username
//!    - `roles` → granted roles
//!
//! ## Security
//!
//! - All non-public endpoints require authentication
//! - Tokens are signed with a local RSA-2048 key pair, generated on first use
//! - No server-side session state; a token stays valid until it expires
//! - All authentication failures look the same to the client

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::AuthenticatedUser;
pub use credentials::{login, CredentialError, CredentialVerifier, IssuedToken, VerifiedUser};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, UserOnly};
pub use keys::{KeyError, KeyPair, KeyStore};
pub use middleware::{require_auth, AuthGate, GateDecision, PublicPaths, TOKEN_COOKIE};
pub use roles::Role;
pub use token::{TokenClaims, TokenCodec, TokenError};
