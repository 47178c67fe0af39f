//! Quiz App · Backend
//!
//! - Axum HTTP API: catalog browsing, result acknowledgement, leaderboard
//! - WebSocket play sessions: one timed quiz attempt per connection
//! - Files from ./public under /public
//!
//! Important env variables:
//!   PORT              : u16 (default 3001)
//!   QUIZ_CONFIG_PATH  : path to TOML config (settings + extra quizzes)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod seeds;
mod catalog;
mod session;
mod timer;
mod play;
mod state;
mod protocol;
mod errors;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::build_router;
use crate::state::AppState;

const DEFAULT_PORT: u16 = 3001;

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quizapp_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "quizapp_backend", "Shutdown signal received");
}

/// `PORT` from the environment, falling back to the default on absence or garbage.
fn listen_addr() -> SocketAddr {
  let port = match std::env::var("PORT") {
    Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
      warn!(target: "quizapp_backend", %raw, default = DEFAULT_PORT, "Invalid PORT; using default");
      DEFAULT_PORT
    }),
    Err(_) => DEFAULT_PORT,
  };
  SocketAddr::from(([0, 0, 0, 0], port))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog, settings and the in-memory leaderboard.
  let state = Arc::new(AppState::new());

  let app = build_router(state);

  let addr = listen_addr();
  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizapp_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}
