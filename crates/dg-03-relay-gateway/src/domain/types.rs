//! Wire types of the HTTP surface.

use dg_01_identity::SignatureLd;
use serde::{Deserialize, Serialize};

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub ok: bool,
    pub response: T,
}

impl<T> ServiceResponse<T> {
    pub fn ok(response: T) -> Self {
        Self { ok: true, response }
    }
}

impl ServiceResponse<String> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            response: message.into(),
        }
    }
}

/// Body of `POST /enroll`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub did: String,
    pub challenge: String,
    pub signature: SignatureLd,
}

/// Issued credential, each field base64 of the PEM text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub cert: String,
    pub key: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}
