//! # HTTP Surface
//!
//! - `POST /enroll` - certificate enrollment
//! - `GET /connect` - websocket session gate
//! - `GET /health` - liveness and session count
//! - anything else - service banner

pub mod connect;
pub mod enroll;

use crate::domain::config::GatewayConfig;
use crate::domain::types::{HealthStatus, ServiceResponse};
use crate::hub::HubHandle;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use dg_01_identity::IdentityVerifier;
use dg_02_certificate_issuer::CertificateIssuer;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub verifier: IdentityVerifier,
    pub issuer: CertificateIssuer,
    pub hub: HubHandle,
    pub outbound_capacity: usize,
    pub banner: Arc<str>,
}

/// Build the gateway router.
pub fn router(state: AppState, config: &GatewayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/enroll",
            post(enroll::enroll).layer(DefaultBodyLimit::max(config.limits.max_enrollment_body)),
        )
        .route("/connect", get(connect::connect))
        .route("/health", get(health))
        .fallback(banner)
        .layer(TimeoutLayer::new(config.timeouts.request))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<ServiceResponse<HealthStatus>> {
    let (status, sessions) = match state.hub.stats().await {
        Ok(stats) => ("ok", stats.sessions),
        Err(_) => ("degraded", 0),
    };

    Json(ServiceResponse::ok(HealthStatus {
        status: status.to_string(),
        version: crate::VERSION.to_string(),
        sessions,
    }))
}

async fn banner(State(state): State<AppState>) -> Json<ServiceResponse<String>> {
    Json(ServiceResponse::ok(state.banner.to_string()))
}
