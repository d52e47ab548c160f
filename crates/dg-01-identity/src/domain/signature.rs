//! # Linked-Data Signatures
//!
//! Detached signatures over a challenge string, in the JSON shape produced by
//! DID tooling.

use crate::domain::document::PublicKeyEntry;
use crate::domain::errors::IdentityError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier};
use serde::{Deserialize, Serialize};

/// Signature suite accepted for challenge verification.
pub const ED25519_SIGNATURE_TYPE: &str = "Ed25519Signature2018";

/// A detached signature object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLd {
    #[serde(rename = "@context", default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
    /// Signature suite
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the key that produced the signature
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creator: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nonce: String,
    /// Base64-encoded signature bytes
    #[serde(rename = "signatureValue")]
    pub value: String,
}

impl SignatureLd {
    /// Wrap a raw ed25519 signature produced by the key `creator`.
    pub fn ed25519(creator: impl Into<String>, signature: &Signature) -> Self {
        Self {
            context: vec!["https://w3id.org/security/v1".to_string()],
            kind: ED25519_SIGNATURE_TYPE.to_string(),
            creator: creator.into(),
            created: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            domain: String::new(),
            nonce: String::new(),
            value: STANDARD.encode(signature.to_bytes()),
        }
    }

    /// Decode `signatureValue`.
    pub fn signature(&self) -> Result<Signature, IdentityError> {
        let raw = STANDARD
            .decode(&self.value)
            .map_err(|_| IdentityError::SignatureInvalid)?;
        Signature::from_slice(&raw).map_err(|_| IdentityError::SignatureInvalid)
    }
}

/// Verify `signature` over the raw challenge bytes with `key`.
pub fn verify_challenge(
    key: &PublicKeyEntry,
    challenge: &[u8],
    signature: &SignatureLd,
) -> Result<(), IdentityError> {
    if signature.kind != ED25519_SIGNATURE_TYPE {
        return Err(IdentityError::SignatureInvalid);
    }
    if !signature.creator.is_empty() && signature.creator != key.id {
        return Err(IdentityError::SignatureInvalid);
    }

    let verifying_key = key.verifying_key()?;
    let sig = signature.signature()?;

    verifying_key
        .verify(challenge, &sig)
        .map_err(|_| IdentityError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    const KEY_ID: &str = "did:bryk:abc123#master";

    fn fixture() -> (SigningKey, PublicKeyEntry) {
        let signing = SigningKey::from_bytes(&[9u8; 32]);
        let entry = PublicKeyEntry::ed25519(KEY_ID, "did:bryk:abc123", &signing.verifying_key());
        (signing, entry)
    }

    #[test]
    fn test_valid_signature() {
        let (signing, entry) = fixture();
        let sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        assert!(verify_challenge(&entry, b"xyz", &sig).is_ok());
    }

    #[test]
    fn test_challenge_bit_flip_fails() {
        let (signing, entry) = fixture();
        let sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        assert_eq!(
            verify_challenge(&entry, b"xyy", &sig),
            Err(IdentityError::SignatureInvalid)
        );
    }

    #[test]
    fn test_signature_bit_flip_fails() {
        let (signing, entry) = fixture();
        let mut bytes = signing.sign(b"xyz").to_bytes();
        bytes[10] ^= 0x01;
        let sig = SignatureLd::ed25519(KEY_ID, &Signature::from_bytes(&bytes));
        assert_eq!(
            verify_challenge(&entry, b"xyz", &sig),
            Err(IdentityError::SignatureInvalid)
        );
    }

    #[test]
    fn test_creator_must_match_key() {
        let (signing, entry) = fixture();
        let sig = SignatureLd::ed25519("did:bryk:abc123#other", &signing.sign(b"xyz"));
        assert_eq!(
            verify_challenge(&entry, b"xyz", &sig),
            Err(IdentityError::SignatureInvalid)
        );
    }

    #[test]
    fn test_anonymous_creator_accepted() {
        let (signing, entry) = fixture();
        let mut sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        sig.creator.clear();
        assert!(verify_challenge(&entry, b"xyz", &sig).is_ok());
    }

    #[test]
    fn test_wrong_suite_and_garbage_value() {
        let (signing, entry) = fixture();
        let mut sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        sig.kind = "RsaSignature2018".into();
        assert!(verify_challenge(&entry, b"xyz", &sig).is_err());

        let mut sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        sig.value = "not base64!".into();
        assert!(verify_challenge(&entry, b"xyz", &sig).is_err());
    }

    #[test]
    fn test_json_round_trip_field_names() {
        let (signing, _) = fixture();
        let sig = SignatureLd::ed25519(KEY_ID, &signing.sign(b"xyz"));
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(json["type"], ED25519_SIGNATURE_TYPE);
        assert_eq!(json["creator"], KEY_ID);
        assert!(json["signatureValue"].is_string());
    }
}
