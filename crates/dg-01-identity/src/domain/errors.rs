//! # Identity Errors
//!
//! Error types for DID resolution and challenge verification.

use thiserror::Error;

/// Errors that can occur while resolving or authenticating a DID.
///
/// The `Display` strings of [`IdentityError::KeyNotFound`] and
/// [`IdentityError::SignatureInvalid`] are returned verbatim to enrolling
/// clients, so they stay generic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The DID string is malformed or uses an unsupported method
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// The DID document could not be fetched or decoded
    #[error("failed to resolve DID: {0}")]
    ResolutionFailed(String),

    /// The resolved identity has no designated master key
    #[error("failed to retrieve master key for the DID")]
    KeyNotFound,

    /// The signature does not verify against the challenge
    #[error("invalid signature/challenge")]
    SignatureInvalid,
}
