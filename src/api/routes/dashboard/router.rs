//! Server rendered dashboard pages

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use http::header;
use serde::Deserialize;
use serde_json::json;

use crate::api::public::ApiError;
use crate::api::routes::stats::db as stats_db;
use crate::api::routes::webhooks::db as webhooks_db;
use crate::api::routes::webhooks::public::PageQuery;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

#[derive(Debug, Deserialize)]
struct IndexQuery {
    // Set by the redirect from /generate to surface the new webhook
    created: Option<String>,
}

fn render(
    state: &SharedState,
    template: &str,
    data: &serde_json::Value,
) -> Result<Html<String>, ApiError> {
    let html = state.read().unwrap().templates.render(template, data)?;
    Ok(Html(html))
}

/// Main dashboard page with stat cards and the daily activity table
async fn index(
    State(state): State<SharedState>,
    Query(params): Query<IndexQuery>,
) -> Result<Html<String>, ApiError> {
    let db = state.read().unwrap().db.clone();

    let totals = stats_db::totals(&db).await?;
    let daily = stats_db::daily_activity(&db, 7).await?;

    let created = match params.created {
        Some(id) => webhooks_db::get_webhook(&db, id).await?,
        None => None,
    };

    let data = json!({
        "totals": totals,
        "daily": daily,
        "daily_json": serde_json::to_string(&daily)?,
        "created": created,
    });
    render(&state, "index", &data)
}

/// Paginated list of all webhooks
async fn webhooks_list(
    State(state): State<SharedState>,
    Query(params): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let (db, per_page) = {
        let state = state.read().unwrap();
        (state.db.clone(), state.config.payloads_per_page)
    };
    let page = webhooks_db::list_webhooks(&db, params.page.unwrap_or(1), per_page).await?;

    let data = json!({
        "webhooks": page.webhooks,
        "current_page": page.current_page,
        "total_pages": page.total_pages,
        "prev_page": page.current_page - 1,
        "next_page": page.current_page + 1,
    });
    render(&state, "webhooks", &data)
}

/// Webhook detail page with its paginated payload history
async fn webhook_detail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let (db, per_page) = {
        let state = state.read().unwrap();
        (state.db.clone(), state.config.payloads_per_page)
    };

    let webhook = webhooks_db::get_webhook(&db, id.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Webhook ID {} not found", id)))?;

    let page = webhooks_db::payloads_page(&db, id, params.page.unwrap_or(1), per_page).await?;
    let payloads = page
        .payloads
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "received_at": p.received_at,
                "body": serde_json::to_string_pretty(&p.body).unwrap_or_default(),
            })
        })
        .collect::<Vec<_>>();

    let data = json!({
        "webhook": webhook,
        "payloads": payloads,
        "current_page": page.current_page,
        "total_pages": page.total_pages,
        "prev_page": page.current_page - 1,
        "next_page": page.current_page + 1,
    });
    render(&state, "webhook", &data)
}

/// Create a webhook and bounce back to the dashboard to show it
async fn generate(State(state): State<SharedState>) -> Result<Redirect, ApiError> {
    let (db, base_url) = {
        let state = state.read().unwrap();
        (state.db.clone(), state.config.base_url.clone())
    };
    let webhook = webhooks_db::create_webhook(&db, &base_url).await?;
    tracing::info!("Created webhook {}", webhook.id);
    Ok(Redirect::to(&format!("/?created={}", webhook.id)))
}

/// Delete a webhook and everything recorded under it
async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let db = state.read().unwrap().db.clone();
    if !webhooks_db::delete_webhook(&db, id.clone()).await? {
        return Err(ApiError::NotFound(format!("Webhook ID {} not found", id)));
    }
    tracing::info!("Deleted webhook {}", id);
    Ok(Redirect::to("/"))
}

fn json_attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Download every payload for a webhook as a single JSON file
async fn download_webhook(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let db = state.read().unwrap().db.clone();
    if webhooks_db::get_webhook(&db, id.clone()).await?.is_none() {
        return Err(ApiError::NotFound(format!("Webhook ID {} not found", id)));
    }

    let payloads = webhooks_db::all_payloads(&db, id.clone()).await?;
    let export = payloads
        .iter()
        .map(|p| json!({ "received_at": p.received_at, "body": p.body }))
        .collect::<Vec<_>>();
    let body = serde_json::to_string_pretty(&export)?;

    Ok(json_attachment(&format!("webhook_{}.json", id), body))
}

/// Download a single payload as a JSON file
async fn download_payload(
    State(state): State<SharedState>,
    Path(payload_id): Path<i64>,
) -> Result<Response, ApiError> {
    let db = state.read().unwrap().db.clone();
    let payload = webhooks_db::get_payload(&db, payload_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payload not found".to_string()))?;

    let body = serde_json::to_string_pretty(&payload.body)?;
    Ok(json_attachment(&format!("payload_{}.json", payload_id), body))
}

/// Static help page
async fn help_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    render(&state, "help", &json!({}))
}

/// Create the dashboard router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(index))
        .route("/generate", axum::routing::post(generate))
        .route("/webhooks", axum::routing::get(webhooks_list))
        .route("/data/{id}", axum::routing::get(webhook_detail))
        .route("/download/{id}", axum::routing::get(download_webhook))
        .route(
            "/download/payload/{payload_id}",
            axum::routing::get(download_payload),
        )
        .route("/delete/{id}", axum::routing::post(delete))
        .route("/help", axum::routing::get(help_page))
}
