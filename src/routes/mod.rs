//! Router assembly: HTTP endpoints, WebSocket upgrade, public files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(http::http_health))
        .route("/quizzes", get(http::http_list_quizzes))
        .route("/quizzes/categories", get(http::http_list_categories))
        .route("/quizzes/:id", get(http::http_get_quiz))
        .route("/results", post(http::http_post_result))
        .route("/results/leaderboard", get(http::http_get_leaderboard))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// `/ws` play sessions, the JSON API under `/api`, static files under
/// `/public`, and a JSON 404 for anything else.
pub fn build_router(state: Arc<AppState>) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Millis));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .nest("/api", api_routes())
        .nest_service("/public", ServeDir::new("./public"))
        .fallback(http::http_not_found)
        .with_state(state)
        .layer(cors())
        .layer(trace)
}
