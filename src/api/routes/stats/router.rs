//! Router for the stats API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use axum_extra::extract::Query;

use super::db;
use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Get webhook activity stats for the dashboard
async fn get_stats(
    State(state): State<SharedState>,
    Query(params): Query<public::StatsQuery>,
) -> Result<Json<public::StatsResponse>, crate::api::public::ApiError> {
    let db = state.read().unwrap().db.clone();

    // Default to the last 7 days if not specified
    let limit_days = params.limit_days.unwrap_or(7);

    let totals = db::totals(&db).await?;
    let daily = db::daily_activity(&db, limit_days).await?;

    Ok(Json(public::StatsResponse { totals, daily }))
}

/// Create the stats router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(get_stats))
}
