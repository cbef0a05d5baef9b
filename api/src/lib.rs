//! HTTP surface of the QA gateway.
//!
//! Three routes: the batch question-answering entry point, the SQL chain
//! entry point, and a health probe. All state is built once in
//! [`core::app_state::AppState::from_env`] and shared through `Arc`.

pub mod core;
pub mod error_handler;

mod routes;

use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::{
    health_route::health, question_answering_route::question_answering,
    sql_chain_route::sql_chain,
};

pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);

    let app = Router::new()
        .route("/question_answering", post(question_answering))
        .route("/sql_chain", post(sql_chain))
        .route("/health", get(health))
        .with_state(state);

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(%host_url, "qa-gateway listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
