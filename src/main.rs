// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use projectdesk_server::{
    api::router,
    auth::{KeyError, KeyStore, Role, TokenCodec},
    config::{
        json_logs_from_env, AppConfig, DEFAULT_LOG_FILTER, SEED_ADMIN_PASSWORD_ENV,
        SEED_ADMIN_USER_ENV,
    },
    state::{AppState, LoginSettings},
    store::{InMemoryUserStore, StoreError},
};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("signing keys unavailable: {0}")]
    Keys(#[from] KeyError),

    #[error("failed to seed accounts: {0}")]
    Seed(#[from] StoreError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(json_logs_from_env());

    let config = AppConfig::from_env();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ProjectDesk server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_target(false)).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    // Keys are loaded or generated exactly once, before any request is served.
    let keys = KeyStore::new(&config.private_key_path, &config.public_key_path);
    let key_pair = keys.load_or_generate()?;
    let codec = TokenCodec::new(&key_pair)?.with_leeway(config.token_leeway_secs);

    let users = seed_users(&config)?;

    let state = AppState::new(codec, users, keys).with_login_settings(LoginSettings {
        token_ttl: config.token_lifetime,
        cookie_secure: config.cookie_secure,
    });
    let app = router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "ProjectDesk server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn seed_users(config: &AppConfig) -> Result<InMemoryUserStore, StoreError> {
    let mut users = InMemoryUserStore::new();
    for (seed, role) in [(&config.seed_admin, Role::Admin), (&config.seed_user, Role::User)] {
        if let Some(account) = seed {
            users.add_user(&account.username, &account.password, None, role)?;
            tracing::info!(username = %account.username, %role, "Seeded account");
        }
    }

    if users.is_empty() {
        tracing::warn!(
            "No accounts configured; set {} and {} to enable login",
            SEED_ADMIN_USER_ENV,
            SEED_ADMIN_PASSWORD_ENV
        );
    }
    Ok(users)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
