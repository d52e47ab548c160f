//! # Identity
//!
//! A DID bound to the keys of its resolved document.

use crate::domain::did::Did;
use crate::domain::document::{DidDocument, PublicKeyEntry};
use crate::domain::errors::IdentityError;
use crate::domain::signature::{verify_challenge, SignatureLd};
use std::fmt;

/// Fragment of the key that must sign enrollment challenges.
pub const MASTER_KEY: &str = "master";

/// A resolved identity. Immutable and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    did: Did,
    keys: Vec<PublicKeyEntry>,
}

impl Identity {
    /// Bind a resolved document to the DID it was requested for.
    pub fn from_document(did: Did, document: DidDocument) -> Result<Self, IdentityError> {
        if document.id != did.to_string() {
            return Err(IdentityError::ResolutionFailed(format!(
                "document id {} does not match {}",
                document.id, did
            )));
        }

        Ok(Self {
            did,
            keys: document.public_keys,
        })
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn method(&self) -> &str {
        self.did.method()
    }

    pub fn subject(&self) -> &str {
        self.did.subject()
    }

    /// Look up a key by fragment.
    pub fn key(&self, fragment: &str) -> Option<&PublicKeyEntry> {
        self.keys.iter().find(|k| k.fragment() == fragment)
    }

    /// Verify that the master key signed `challenge`.
    pub fn verify(&self, challenge: &str, signature: &SignatureLd) -> Result<(), IdentityError> {
        let master = self.key(MASTER_KEY).ok_or(IdentityError::KeyNotFound)?;
        verify_challenge(master, challenge.as_bytes(), signature)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.did.fmt(f)
    }
}
