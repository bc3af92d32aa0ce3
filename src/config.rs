// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, default values, and the [`AppConfig`] they
//! are loaded into once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_PRIVATE_KEY_PATH` | PKCS#8 PEM private signing key | `keys/private_key.pem` |
//! | `JWT_PUBLIC_KEY_PATH` | SPKI PEM public verification key | `keys/public_key.pem` |
//! | `JWT_LIFETIME_SECS` | Token time-to-live in seconds | `86400` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance on expiry | `0` |
//! | `COOKIE_SECURE` | Mark the `jwt` cookie `Secure` | `false` |
//! | `SEED_ADMIN_USER` / `SEED_ADMIN_PASSWORD` | Bootstrap admin account | unset |
//! | `SEED_USER` / `SEED_USER_PASSWORD` | Bootstrap regular account | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Path of the private signing key.
///
/// Generated together with the public key on first start if missing.
pub const PRIVATE_KEY_PATH_ENV: &str = "JWT_PRIVATE_KEY_PATH";
pub const PUBLIC_KEY_PATH_ENV: &str = "JWT_PUBLIC_KEY_PATH";

/// Token time-to-live in seconds.
pub const TOKEN_LIFETIME_ENV: &str = "JWT_LIFETIME_SECS";
pub const TOKEN_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";

/// Set to `true` when the service sits behind HTTPS.
pub const COOKIE_SECURE_ENV: &str = "COOKIE_SECURE";

pub const SEED_ADMIN_USER_ENV: &str = "SEED_ADMIN_USER";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const SEED_USER_ENV: &str = "SEED_USER";
pub const SEED_USER_PASSWORD_ENV: &str = "SEED_USER_PASSWORD";

/// `json` for structured logs, anything else for human-readable output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "keys/private_key.pem";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "keys/public_key.pem";

/// One day, matching the cookie max-age.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 86_400;
pub const DEFAULT_TOKEN_LEEWAY_SECS: u64 = 0;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Username and password for an account created at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub token_lifetime: Duration,
    pub token_leeway_secs: u64,
    pub cookie_secure: bool,
    pub seed_admin: Option<SeedAccount>,
    pub seed_user: Option<SeedAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(PORT_ENV, get(PORT_ENV), DEFAULT_PORT),
            private_key_path: get(PRIVATE_KEY_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_PRIVATE_KEY_PATH.to_string())
                .into(),
            public_key_path: get(PUBLIC_KEY_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_PUBLIC_KEY_PATH.to_string())
                .into(),
            token_lifetime: Duration::from_secs(parse_or(
                TOKEN_LIFETIME_ENV,
                get(TOKEN_LIFETIME_ENV),
                DEFAULT_TOKEN_LIFETIME_SECS,
            )),
            token_leeway_secs: parse_or(
                TOKEN_LEEWAY_ENV,
                get(TOKEN_LEEWAY_ENV),
                DEFAULT_TOKEN_LEEWAY_SECS,
            ),
            cookie_secure: parse_flag(COOKIE_SECURE_ENV, get(COOKIE_SECURE_ENV)),
            seed_admin: seed_account(get(SEED_ADMIN_USER_ENV), get(SEED_ADMIN_PASSWORD_ENV)),
            seed_user: seed_account(get(SEED_USER_ENV), get(SEED_USER_PASSWORD_ENV)),
        }
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Whether `LOG_FORMAT` asks for JSON logs.
///
/// Read on its own because logging is set up before [`AppConfig`] is loaded.
pub fn json_logs_from_env() -> bool {
    std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.trim().eq_ignore_ascii_case("json"))
}

fn parse_or<T: std::str::FromStr + std::fmt::Display + Copy>(
    name: &str,
    value: Option<String>,
    default: T,
) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, %default, "Invalid value, using default");
            default
        }),
    }
}

fn parse_flag(name: &str, value: Option<String>) -> bool {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => false,
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        Some(other) => {
            tracing::warn!(variable = name, value = other, "Invalid flag, using false");
            false
        }
    }
}

fn seed_account(username: Option<String>, password: Option<String>) -> Option<SeedAccount> {
    Some(SeedAccount {
        username: username?,
        password: password?,
    })
}
