//! Axum router setup for the reftable server

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::{
    handlers::{get_document, get_markdown, get_nodes, get_table, health_check, index_page},
    ServerState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/health", get(health_check))
        .route("/api/table", get(get_table))
        .route("/api/table/markdown", get(get_markdown))
        .route("/api/nodes", get(get_nodes))
        .route("/api/documents/*key", get(get_document))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
