//! # DID Documents
//!
//! The subset of a DID document this application reads: the document id and
//! its public keys.

use crate::domain::errors::IdentityError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

/// Key type accepted for challenge verification.
pub const ED25519_KEY_TYPE: &str = "Ed25519VerificationKey2018";

/// A resolved DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    /// DID this document describes
    pub id: String,
    /// Public keys bound to the DID
    #[serde(rename = "publicKey", default)]
    pub public_keys: Vec<PublicKeyEntry>,
    /// Key ids usable for authentication
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,
}

impl DidDocument {
    /// Create an empty document for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            context: None,
            id: id.into(),
            public_keys: Vec::new(),
            authentication: Vec::new(),
        }
    }

    /// Add a key entry.
    pub fn with_key(mut self, key: PublicKeyEntry) -> Self {
        self.public_keys.push(key);
        self
    }
}

/// A single public key entry of a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyEntry {
    /// Full key id, `<did>#<fragment>`
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub controller: String,
    #[serde(rename = "publicKeyHex", default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    #[serde(rename = "publicKeyBase64", default, skip_serializing_if = "Option::is_none")]
    pub public_key_base64: Option<String>,
}

impl PublicKeyEntry {
    /// Build an ed25519 key entry with a hex-encoded public key.
    pub fn ed25519(id: impl Into<String>, controller: impl Into<String>, key: &VerifyingKey) -> Self {
        Self {
            id: id.into(),
            kind: ED25519_KEY_TYPE.to_string(),
            controller: controller.into(),
            public_key_hex: Some(hex::encode(key.as_bytes())),
            public_key_base64: None,
        }
    }

    /// Fragment part of the key id (`master` for `did:bryk:abc#master`).
    pub fn fragment(&self) -> &str {
        self.id
            .rsplit_once('#')
            .map(|(_, fragment)| fragment)
            .unwrap_or(&self.id)
    }

    /// Decode the entry into an ed25519 verifying key.
    ///
    /// Any decoding problem is reported as [`IdentityError::SignatureInvalid`]:
    /// a key that cannot be used cannot have produced a valid signature.
    pub fn verifying_key(&self) -> Result<VerifyingKey, IdentityError> {
        if self.kind != ED25519_KEY_TYPE {
            return Err(IdentityError::SignatureInvalid);
        }

        let raw = match (&self.public_key_hex, &self.public_key_base64) {
            (Some(encoded), _) => hex::decode(encoded).map_err(|_| IdentityError::SignatureInvalid)?,
            (None, Some(encoded)) => STANDARD
                .decode(encoded)
                .map_err(|_| IdentityError::SignatureInvalid)?,
            (None, None) => return Err(IdentityError::SignatureInvalid),
        };

        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| IdentityError::SignatureInvalid)?;

        VerifyingKey::from_bytes(&bytes).map_err(|_| IdentityError::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn test_document_json_shape() {
        let json = r#"{
            "@context": "https://w3id.org/did/v1",
            "id": "did:bryk:abc123",
            "publicKey": [{
                "id": "did:bryk:abc123#master",
                "type": "Ed25519VerificationKey2018",
                "controller": "did:bryk:abc123",
                "publicKeyHex": "00"
            }],
            "authentication": ["did:bryk:abc123#master"]
        }"#;

        let doc: DidDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id, "did:bryk:abc123");
        assert_eq!(doc.public_keys.len(), 1);
        assert_eq!(doc.public_keys[0].fragment(), "master");
    }

    #[test]
    fn test_hex_and_base64_keys_decode_to_same_key() {
        let key = SigningKey::from_bytes(&[3u8; 32]).verifying_key();
        let hex_entry = PublicKeyEntry::ed25519("did:bryk:a#master", "did:bryk:a", &key);
        let b64_entry = PublicKeyEntry {
            public_key_hex: None,
            public_key_base64: Some(STANDARD.encode(key.as_bytes())),
            ..hex_entry.clone()
        };

        assert_eq!(hex_entry.verifying_key().unwrap(), key);
        assert_eq!(b64_entry.verifying_key().unwrap(), key);
    }

    #[test]
    fn test_unsupported_key_type() {
        let key = SigningKey::from_bytes(&[3u8; 32]).verifying_key();
        let mut entry = PublicKeyEntry::ed25519("did:bryk:a#master", "did:bryk:a", &key);
        entry.kind = "RsaVerificationKey2018".into();
        assert_eq!(entry.verifying_key(), Err(IdentityError::SignatureInvalid));
    }

    #[test]
    fn test_truncated_key() {
        let mut entry = PublicKeyEntry::ed25519(
            "did:bryk:a#master",
            "did:bryk:a",
            &SigningKey::from_bytes(&[3u8; 32]).verifying_key(),
        );
        entry.public_key_hex = Some("abcd".into());
        assert_eq!(entry.verifying_key(), Err(IdentityError::SignatureInvalid));
    }
}
