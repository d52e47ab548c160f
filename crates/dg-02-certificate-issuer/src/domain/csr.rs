//! # Certificate Requests
//!
//! JSON certificate requests (cfssl shape) and the fixed template used for
//! end-user enrollment.

use crate::domain::errors::IssuanceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request template for enrolled users. `{{DID}}` is replaced with the
/// JSON-escaped canonical DID.
pub const USER_CSR_TEMPLATE: &str = r#"{
  "cn": "{{DID}}",
  "hosts": [
    "{{DID}}"
  ],
  "key": {
    "algo": "ecdsa",
    "size": 521
  },
  "names": [
    {
      "o": "Singapore University of Social Sciences",
      "sa": "463 Clementi Road",
      "st": "Singapore",
      "pc": "599494",
      "c": "SG"
    }
  ]
}"#;

/// A certificate signing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrRequest {
    /// Subject common name
    pub cn: String,
    /// Subject alternative names
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub key: KeySpec,
    #[serde(default)]
    pub names: Vec<NameEntry>,
    /// Present only on root requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaSpec>,
}

impl CsrRequest {
    pub fn from_json(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub algo: String,
    #[serde(default)]
    pub size: u32,
}

impl Default for KeySpec {
    fn default() -> Self {
        Self {
            algo: "ecdsa".to_string(),
            size: 256,
        }
    }
}

/// One subject name entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Country
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub c: String,
    /// State or province
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub st: String,
    /// Locality
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub l: String,
    /// Organization
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub o: String,
    /// Organizational unit
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ou: String,
    /// Street address
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sa: String,
    /// Postal code
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaSpec {
    #[serde(with = "crate::domain::duration")]
    pub expiry: Duration,
}

/// Render [`USER_CSR_TEMPLATE`] for `did`.
pub fn render_user_csr(did: &str) -> Result<CsrRequest, IssuanceError> {
    let quoted = serde_json::to_string(did).map_err(|e| IssuanceError::CsrRender(e.to_string()))?;
    let escaped = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| IssuanceError::CsrRender("unexpected string encoding".into()))?;

    let rendered = USER_CSR_TEMPLATE.replace("{{DID}}", escaped);
    serde_json::from_str(&rendered).map_err(|e| IssuanceError::CsrRender(e.to_string()))
}
