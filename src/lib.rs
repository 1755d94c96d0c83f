//! Credit Account Service
//!
//! REST API for opening credit-limited accounts and recording debit/credit
//! transactions against them.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or an in-memory store when no database is configured
//! - **Format**: JSON requests/responses
//!
//! Handlers validate input and call the services; the services apply the domain
//! rules on top of the store traits in [`stores`].

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    state::AppState,
    stores::{MemoryStore, PgStore},
};

/// Build the HTTP router over an already-wired state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/accounts", post(handlers::accounts::create_account))
        .route("/accounts/{id}", get(handlers::accounts::get_account))
        .route(
            "/operation-types/{id}",
            get(handlers::operation_types::get_operation_type),
        )
        .route(
            "/transactions",
            post(handlers::transactions::create_transaction),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Connect the configured store and wire the services.
///
/// With a `DATABASE_URL` this creates the pool and runs the migrations;
/// without one everything lives in memory and is lost on exit.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let deadline = config.store_timeout();

    let state = match &config.database_url {
        Some(url) => {
            let pool =
                db::create_pool(url, config.database_max_connections, deadline).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            AppState::new(
                Arc::new(PgStore::new(pool.clone())),
                config.transaction_mode,
                deadline,
            )
            .with_pool(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            AppState::new(
                Arc::new(MemoryStore::seeded()),
                config.transaction_mode,
                deadline,
            )
        }
    };

    tracing::info!(
        atomic = state.transactions.is_atomic(),
        "Transaction workflow configured"
    );

    Ok(state)
}
