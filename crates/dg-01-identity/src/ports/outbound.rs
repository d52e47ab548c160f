//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this subsystem needs.

use crate::domain::did::Did;
use crate::domain::document::DidDocument;
use crate::domain::errors::IdentityError;

/// Source of DID documents.
///
/// Implementations only fetch and decode; binding the document to the
/// requested DID is done by the verifier.
#[async_trait::async_trait]
pub trait DidResolver: Send + Sync {
    /// Fetch the document for `did`.
    ///
    /// # Errors
    /// * `IdentityError::ResolutionFailed` - network, status or decoding failure
    async fn fetch_document(&self, did: &Did) -> Result<DidDocument, IdentityError>;
}
