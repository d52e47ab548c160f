//! # Certificate Issuer Errors

use thiserror::Error;

/// Errors raised by a certificate authority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaError {
    #[error("failed to access CA material '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("invalid CA configuration: {0}")]
    Config(String),

    #[error("invalid CA certificate or key: {0}")]
    InvalidRoot(String),

    #[error("unknown signing profile '{0}'")]
    UnknownProfile(String),

    #[error("invalid certificate request: {0}")]
    InvalidRequest(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("certificate verification failed: {0}")]
    Verification(String),
}

/// Errors surfaced by the issuance service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssuanceError {
    /// The CSR template could not be rendered for the identity
    #[error("failed to generate CSR: {0}")]
    CsrRender(String),

    /// The CA refused or failed to sign
    #[error("failed to generate certificate: {0}")]
    SigningFailed(String),

    /// Presented certificate is malformed or not trusted for the profile
    #[error("invalid certificate: {0}")]
    CertificateInvalid(String),
}
