//! `POST /enroll`: exchange a signed challenge for a user certificate.
//!
//! Steps run in order and the first failure answers the request: read body,
//! decode, resolve DID, verify challenge, issue certificate. Nothing is
//! retried.

use crate::api::AppState;
use crate::domain::error::EnrollmentError;
use crate::domain::types::{EnrollmentRequest, EnrollmentResponse, ServiceResponse};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

pub async fn enroll(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ServiceResponse<EnrollmentResponse>>, EnrollmentError> {
    let body = body.map_err(|e| EnrollmentError::Transport(e.body_text()))?;
    if body.is_empty() {
        return Err(EnrollmentError::Validation("empty request".into()));
    }

    let request: EnrollmentRequest = serde_json::from_slice(&body)
        .map_err(|_| EnrollmentError::Validation("invalid request contents".into()))?;

    let identity = state
        .verifier
        .resolve(&request.did)
        .await
        .map_err(EnrollmentError::Resolution)?;

    state
        .verifier
        .verify(&identity, &request.challenge, &request.signature)
        .map_err(EnrollmentError::Authentication)?;

    let credential = state
        .issuer
        .issue_user_certificate(&identity)
        .map_err(EnrollmentError::Issuance)?;

    info!(did = %identity, "Enrollment completed");
    let (cert, key) = credential.into_parts();
    Ok(Json(ServiceResponse::ok(EnrollmentResponse {
        cert: STANDARD.encode(cert),
        key: STANDARD.encode(key),
    })))
}
