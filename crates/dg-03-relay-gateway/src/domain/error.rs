//! Gateway error types.
//!
//! Enrollment failures become a `{ok: false, response: <message>}` envelope
//! with status 400. Messages are fixed per category so verifier and CA
//! internals are only visible in the logs.

use crate::domain::types::ServiceResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dg_01_identity::IdentityError;
use dg_02_certificate_issuer::IssuanceError;
use thiserror::Error;
use tracing::warn;

/// Reasons an enrollment request is refused.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// User-correctable request problem
    #[error("{0}")]
    Validation(String),

    /// The DID could not be parsed, is unsupported, or could not be fetched
    #[error("failed to resolve DID")]
    Resolution(#[source] IdentityError),

    /// Challenge signature rejected; the verifier's message is returned as is
    #[error("{0}")]
    Authentication(IdentityError),

    #[error("{}", issuance_message(.0))]
    Issuance(IssuanceError),

    /// The request body could not be read
    #[error("empty request")]
    Transport(String),
}

fn issuance_message(err: &IssuanceError) -> &'static str {
    match err {
        IssuanceError::CsrRender(_) => "failed to generate CSR",
        IssuanceError::SigningFailed(_) => "failed to generate certificate",
        IssuanceError::CertificateInvalid(_) => "invalid certificate",
    }
}

impl EnrollmentError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn detail(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Transport(msg) => msg.clone(),
            Self::Resolution(e) | Self::Authentication(e) => e.to_string(),
            Self::Issuance(e) => e.to_string(),
        }
    }
}

impl IntoResponse for EnrollmentError {
    fn into_response(self) -> Response {
        warn!(error = %self, detail = %self.detail(), "Enrollment rejected");
        (self.status(), Json(ServiceResponse::error(self.to_string()))).into_response()
    }
}

/// Gateway-level errors (startup and serving)
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Serve(String),
}
