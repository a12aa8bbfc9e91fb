/// API route modules
pub mod download;
pub mod health;
pub mod processing;
pub mod separation;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router with every route under `/api`
pub fn router(app_state: AppState) -> Router {
    let upload_limit = app_state.config.server.max_upload_mb * 1024 * 1024;

    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/denoise", post(processing::denoise))
        .route("/normalize", post(processing::normalize))
        .route("/separate", post(separation::separate))
        .route("/download", post(download::download));

    Router::new()
        .nest("/api", routes)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
