//! API routes module

pub mod dashboard;
pub mod push;
pub mod stats;
pub mod webhooks;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Webhook CRUD and payload lookup
        .nest("/webhooks", webhooks::router())
        // Dashboard statistics
        .nest("/stats", stats::router())
        // Push notification routes
        .nest("/push", push::router())
}
