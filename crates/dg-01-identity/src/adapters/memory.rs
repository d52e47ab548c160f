//! In-memory resolver for tests and offline setups.

use crate::domain::did::Did;
use crate::domain::document::DidDocument;
use crate::domain::errors::IdentityError;
use crate::ports::outbound::DidResolver;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Documents keyed by their `id`.
#[derive(Debug, Default)]
pub struct MemoryDidResolver {
    documents: RwLock<HashMap<String, DidDocument>>,
}

impl MemoryDidResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) a document.
    pub fn insert(&self, document: DidDocument) {
        self.documents.write().insert(document.id.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait::async_trait]
impl DidResolver for MemoryDidResolver {
    async fn fetch_document(&self, did: &Did) -> Result<DidDocument, IdentityError> {
        self.documents
            .read()
            .get(&did.to_string())
            .cloned()
            .ok_or_else(|| IdentityError::ResolutionFailed(format!("no document for {did}")))
    }
}
