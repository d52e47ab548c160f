//! # Identity Verification Service
//!
//! Resolves DIDs through a [`DidResolver`] and checks challenge signatures
//! against the master key of the resolved document.

use crate::domain::did::{Did, SUPPORTED_METHOD};
use crate::domain::errors::IdentityError;
use crate::domain::identity::Identity;
use crate::domain::signature::SignatureLd;
use crate::ports::outbound::DidResolver;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves and authenticates DID holders.
#[derive(Clone)]
pub struct IdentityVerifier {
    resolver: Arc<dyn DidResolver>,
}

impl IdentityVerifier {
    pub fn new(resolver: Arc<dyn DidResolver>) -> Self {
        Self { resolver }
    }

    /// Parse `did`, fetch its document and bind the two together.
    ///
    /// # Errors
    /// * `IdentityError::InvalidDid` - malformed DID or unsupported method
    /// * `IdentityError::ResolutionFailed` - the document could not be obtained
    pub async fn resolve(&self, did: &str) -> Result<Identity, IdentityError> {
        let did = Did::parse(did)?;
        if did.method() != SUPPORTED_METHOD {
            return Err(IdentityError::InvalidDid(format!(
                "only the '{SUPPORTED_METHOD}' DID method is supported for this application"
            )));
        }

        debug!(did = %did, "Resolving DID");
        let document = self.resolver.fetch_document(&did).await.map_err(|e| {
            warn!(did = %did, error = %e, "DID resolution failed");
            e
        })?;

        Identity::from_document(did, document)
    }

    /// Check that `signature` is the identity's master key over `challenge`.
    pub fn verify(
        &self,
        identity: &Identity,
        challenge: &str,
        signature: &SignatureLd,
    ) -> Result<(), IdentityError> {
        identity.verify(challenge, signature)
    }
}
