//! HTTP control surface
//!
//! The seam where the (external) presentation layer attaches: one route per
//! user action plus status and health. The router holds no view state of its
//! own; everything goes through the controller's event channel.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::sync::mpsc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controller::ControllerEvent;
use handlers::*;

/// Shared context for the HTTP handlers.
#[derive(Debug)]
pub struct ApiContext {
    /// Channel into the controller event loop.
    pub events_tx: mpsc::Sender<ControllerEvent>,
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

/// Create the HTTP router with all endpoints
pub fn create_router(ctx: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/dismiss", post(dismiss_handler))
        .route("/drink", post(drink_handler))
        .route("/close", post(close_handler))
        .route("/settings/open", post(settings_open_handler))
        .route("/settings/draft", put(settings_draft_handler))
        .route("/settings/preset", post(settings_preset_handler))
        .route("/settings/save", post(settings_save_handler))
        .route("/settings/back", post(settings_back_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
