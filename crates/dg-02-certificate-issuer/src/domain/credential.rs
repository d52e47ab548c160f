//! Issued certificate material.

use std::fmt;

/// A signed certificate and its private key, both PEM encoded.
///
/// The key never leaves this value except through [`Credential::key_pem`];
/// `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    certificate_pem: String,
    private_key_pem: String,
}

impl Credential {
    pub fn new(certificate_pem: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self {
            certificate_pem: certificate_pem.into(),
            private_key_pem: private_key_pem.into(),
        }
    }

    pub fn cert_pem(&self) -> &str {
        &self.certificate_pem
    }

    pub fn key_pem(&self) -> &str {
        &self.private_key_pem
    }

    pub fn into_parts(self) -> (String, String) {
        (self.certificate_pem, self.private_key_pem)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("certificate_pem", &self.certificate_pem)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}
