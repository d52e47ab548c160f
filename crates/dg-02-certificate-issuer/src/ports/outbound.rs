//! # Outbound Ports

use crate::domain::credential::Credential;
use crate::domain::csr::CsrRequest;
use crate::domain::errors::CaError;

/// A certificate authority able to sign requests and check certificates
/// against its named profiles.
pub trait CertificateAuthority: Send + Sync {
    /// Generate a key for `request` and sign a certificate under `profile`.
    fn sign(&self, request: &CsrRequest, profile: &str) -> Result<Credential, CaError>;

    /// Verify a DER certificate chains to this CA and is valid for `profile`.
    fn verify(&self, cert_der: &[u8], profile: &str) -> Result<(), CaError>;
}
