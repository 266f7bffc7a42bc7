//! Impact Viewer Service Library
//!
//! Serves the meteorite and crater viewer page and the JSON view endpoints
//! behind it. Filtering, colouring and ranking run here, over data loaded
//! once at startup (craters) or by a background task (meteorites).

pub mod config;
pub mod craters;
pub mod handlers;
pub mod loader;
pub mod page;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the router with all routes and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::page::index_handler))
        // Views
        .route(
            "/api/meteorites/view",
            post(handlers::meteorites::meteorite_view_handler),
        )
        .route(
            "/api/craters/view",
            post(handlers::craters::crater_view_handler),
        )
        .route("/api/options", get(handlers::options::options_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
