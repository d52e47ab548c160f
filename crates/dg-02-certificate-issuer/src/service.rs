//! # Certificate Issuer Service
//!
//! Issues "user" certificates for verified identities and checks
//! certificates presented back to the service.

use crate::domain::certificate::{common_name, decode_certificate};
use crate::domain::credential::Credential;
use crate::domain::csr::render_user_csr;
use crate::domain::errors::IssuanceError;
use crate::domain::profile::USER_PROFILE;
use crate::ports::outbound::CertificateAuthority;
use dg_01_identity::Identity;
use std::sync::Arc;
use tracing::{info, warn};

/// A certificate that passed verification under the "user" profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCertificate {
    pub der: Vec<u8>,
    /// Subject common name, if the certificate carries one
    pub common_name: Option<String>,
}

/// Issues and verifies end-user certificates through a [`CertificateAuthority`].
#[derive(Clone)]
pub struct CertificateIssuer {
    ca: Arc<dyn CertificateAuthority>,
}

impl CertificateIssuer {
    pub fn new(ca: Arc<dyn CertificateAuthority>) -> Self {
        Self { ca }
    }

    /// Render the user CSR for `identity` and sign it under "user".
    ///
    /// # Errors
    /// * `IssuanceError::CsrRender` - the template could not be rendered
    /// * `IssuanceError::SigningFailed` - the CA refused or failed to sign
    pub fn issue_user_certificate(&self, identity: &Identity) -> Result<Credential, IssuanceError> {
        let request = render_user_csr(&identity.did().to_string())?;

        let credential = self.ca.sign(&request, USER_PROFILE).map_err(|e| {
            warn!(did = %identity, error = %e, "Certificate signing failed");
            IssuanceError::SigningFailed(e.to_string())
        })?;

        info!(did = %identity, "Issued user certificate");
        Ok(credential)
    }

    /// Verify a DER or PEM certificate under "user".
    pub fn verify_user_certificate(
        &self,
        presented: &[u8],
    ) -> Result<VerifiedCertificate, IssuanceError> {
        let der = decode_certificate(presented)
            .map_err(|e| IssuanceError::CertificateInvalid(e.to_string()))?;

        self.ca
            .verify(&der, USER_PROFILE)
            .map_err(|e| IssuanceError::CertificateInvalid(e.to_string()))?;

        let common_name = common_name(&der);
        Ok(VerifiedCertificate { der, common_name })
    }
}
