//! HTTP front for the todos & login service.
//!
//! # Overview
//! Three pages, each with a loader (`GET`) and an action (`POST`):
//! `/` (home, sign-out, favorite color), `/login` (sign in) and `/todos`
//! (the list). Sessions live in a signed cookie; todos live in whichever
//! `TodoStore` the configuration names.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;

pub use config::{Backend, Config};
pub use state::AppState;

use routes::{home_loader, login_action, login_loader, root_action, todos_action, todos_loader};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_loader).post(root_action))
        .route("/login", get(login_loader).post(login_action))
        .route("/todos", get(todos_loader).post(todos_action))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
