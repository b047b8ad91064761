//! Router for the push API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use serde_json::Value;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

// Register a dashboard client for new-payload push notifications
async fn push_subscription(
    State(state): State<SharedState>,
    Json(subscription): Json<public::PushSubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let p256dh = subscription
        .keys
        .get("p256dh")
        .ok_or_else(|| ApiError::BadRequest("Missing p256dh key".to_string()))?
        .clone();
    let auth = subscription
        .keys
        .get("auth")
        .ok_or_else(|| ApiError::BadRequest("Missing auth key".to_string()))?
        .clone();

    {
        let db = state.read().unwrap().db.clone();
        db.call(move |conn| {
            let mut subscription_stmt = conn.prepare(
                "REPLACE INTO push_subscription(endpoint, p256dh, auth) VALUES (?, ?, ?)",
            )?;
            subscription_stmt.execute(tokio_rusqlite::params![
                subscription.endpoint,
                p256dh,
                auth,
            ])?;
            Ok(())
        })
        .await?;
    }

    Ok(Json(serde_json::json!({"success": true})))
}

/// Create the push router
pub fn router() -> Router<SharedState> {
    Router::new().route("/subscribe", axum::routing::post(push_subscription))
}
