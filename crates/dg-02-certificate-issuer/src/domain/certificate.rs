//! Certificate decoding helpers.

use crate::domain::errors::CaError;
use x509_parser::prelude::{FromDer, X509Certificate};

const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Accept a certificate as DER or PEM and return the DER bytes.
pub fn decode_certificate(bytes: &[u8]) -> Result<Vec<u8>, CaError> {
    let trimmed = bytes.trim_ascii_start();
    if !trimmed.starts_with(PEM_MARKER) {
        return Ok(bytes.to_vec());
    }

    let (_, pem) = x509_parser::pem::parse_x509_pem(trimmed)
        .map_err(|e| CaError::Verification(format!("malformed PEM: {e}")))?;
    if pem.label != "CERTIFICATE" {
        return Err(CaError::Verification(format!(
            "expected a CERTIFICATE block, found {}",
            pem.label
        )));
    }
    Ok(pem.contents)
}

/// First subject common name of a DER certificate.
pub fn common_name(cert_der: &[u8]) -> Option<String> {
    let (_, cert) = X509Certificate::from_der(cert_der).ok()?;
    let cn = cert.subject().iter_common_name().next()?;
    cn.as_str().ok().map(str::to_string)
}
