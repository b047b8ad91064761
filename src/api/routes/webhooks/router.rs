//! Router for the webhooks API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
};
use axum_extra::extract::Query;
use serde_json::Value;

use super::db;
use super::public::{PageQuery, PayloadRecord, ReceiveAck, Webhook, WebhookPage};
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::notify;

type SharedState = Arc<RwLock<AppState>>;

/// Public ingest endpoint. Accepts any JSON value, stores it with the
/// current timestamp, and acks with that timestamp. The content type
/// header is ignored, only parseability matters. Takes the raw bytes
/// so that unparseable bodies still reach the failure bookkeeping.
pub async fn receive_payload(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    raw_body: Bytes,
) -> Result<Json<ReceiveAck>, ApiError> {
    let db = state.read().unwrap().db.clone();

    if db::get_webhook(&db, id.clone()).await?.is_none() {
        return Err(ApiError::NotFound(format!("Webhook ID {} not found", id)));
    }

    let body: Value = match serde_json::from_slice(&raw_body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Rejected non-JSON payload for webhook {}: {}", id, err);
            db::record_failure(&db, id).await?;
            return Err(ApiError::BadRequest(format!(
                "Request body is not valid JSON: {}",
                err
            )));
        }
    };

    let (payload_id, timestamp) = db::record_payload(&db, id.clone(), body).await?;
    tracing::info!("Stored payload {} for webhook {}", payload_id, id);

    // Tell subscribed dashboard clients about the new payload without
    // holding up the ack to the sender
    let vapid_key_path = state.read().unwrap().config.vapid_key_path.clone();
    if let Some(vapid_key_path) = vapid_key_path {
        tokio::spawn(notify::notify_new_payload(db, vapid_key_path, id));
    }

    Ok(Json(ReceiveAck {
        status: "received".to_string(),
        timestamp,
    }))
}

/// Create a webhook with a server generated id
async fn create_webhook(State(state): State<SharedState>) -> Result<Json<Webhook>, ApiError> {
    let (db, base_url) = {
        let state = state.read().unwrap();
        (state.db.clone(), state.config.base_url.clone())
    };
    let webhook = db::create_webhook(&db, &base_url).await?;
    tracing::info!("Created webhook {}", webhook.id);
    Ok(Json(webhook))
}

/// Paginated list of all webhooks, newest first
async fn list_webhooks(
    State(state): State<SharedState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<WebhookPage>, ApiError> {
    let (db, per_page) = {
        let state = state.read().unwrap();
        (state.db.clone(), state.config.payloads_per_page)
    };
    let page = db::list_webhooks(&db, params.page.unwrap_or(1), per_page).await?;
    Ok(Json(page))
}

/// A single webhook record
async fn get_webhook(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Webhook>, ApiError> {
    let db = state.read().unwrap().db.clone();
    match db::get_webhook(&db, id.clone()).await? {
        Some(webhook) => Ok(Json(webhook)),
        None => Err(ApiError::NotFound(format!("Webhook ID {} not found", id))),
    }
}

/// All payloads for a webhook, most recent first
async fn list_payloads(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PayloadRecord>>, ApiError> {
    let db = state.read().unwrap().db.clone();
    if db::get_webhook(&db, id.clone()).await?.is_none() {
        return Err(ApiError::NotFound(format!("Webhook ID {} not found", id)));
    }
    let payloads = db::all_payloads(&db, id).await?;
    Ok(Json(payloads))
}

/// Delete a webhook and everything recorded under it
async fn delete_webhook(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.read().unwrap().db.clone();
    if !db::delete_webhook(&db, id.clone()).await? {
        return Err(ApiError::NotFound(format!("Webhook ID {} not found", id)));
    }
    tracing::info!("Deleted webhook {}", id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Create the webhooks router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            axum::routing::post(create_webhook).get(list_webhooks),
        )
        .route(
            "/{id}",
            axum::routing::get(get_webhook).delete(delete_webhook),
        )
        .route("/{id}/payloads", axum::routing::get(list_payloads))
}
