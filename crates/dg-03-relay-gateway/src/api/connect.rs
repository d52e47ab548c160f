//! `GET /connect`: certificate-gated websocket upgrade.
//!
//! The caller presents its user certificate, base64 encoded, in the
//! `X-user-certificate` header. Rejections carry no body.

use crate::api::AppState;
use crate::hub::run_session;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

/// Header carrying the base64 user certificate
pub const CERTIFICATE_HEADER: &str = "x-user-certificate";

/// Alias used when a verified certificate has no common name
const ANONYMOUS_ALIAS: &str = "anonymous";

pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    upgrade: Option<WebSocketUpgrade>,
) -> Response {
    let alias = match authenticate(&state, &headers) {
        Ok(alias) => alias,
        Err(reason) => {
            warn!(%reason, "Connection refused");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    let Some(upgrade) = upgrade else {
        warn!(alias = %alias, "Connection refused: not a websocket upgrade");
        return StatusCode::BAD_REQUEST.into_response();
    };

    debug!(alias = %alias, "Upgrading connection");
    let hub = state.hub.clone();
    let capacity = state.outbound_capacity;
    upgrade.on_upgrade(move |socket| run_session(socket, alias, hub, capacity))
}

/// Verify the presented certificate and derive the session alias.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, String> {
    let encoded = headers
        .get(CERTIFICATE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "missing user certificate".to_string())?;

    let certificate = STANDARD
        .decode(encoded)
        .map_err(|_| "failed to decode provided certificate".to_string())?;

    let verified = state
        .issuer
        .verify_user_certificate(&certificate)
        .map_err(|e| e.to_string())?;

    Ok(verified
        .common_name
        .unwrap_or_else(|| ANONYMOUS_ALIAS.to_string()))
}
