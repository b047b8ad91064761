//! HTTP Basic auth for the dashboard and JSON API

use std::sync::{Arc, RwLock};

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{StatusCode, header};

use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

fn challenge() -> Response {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Basic realm=\"hookbin\"")
        .body(Body::from("Unauthorized"))
        .unwrap_or_else(|_| Response::new(Body::from("Unauthorized")))
}

/// Parse `Authorization: Basic <b64>` into a username/password pair.
fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Middleware guarding everything except the public ingest route.
pub async fn require_basic_auth(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic);

    let (user, password) = match credentials {
        Some(pair) => pair,
        None => return challenge(),
    };

    let authorized = {
        let state = state.read().unwrap();
        user == state.config.admin_user && password == state.config.admin_password
    };

    if !authorized {
        tracing::warn!("Rejected dashboard login for user {}", user);
        return challenge();
    }

    next.run(request).await
}
