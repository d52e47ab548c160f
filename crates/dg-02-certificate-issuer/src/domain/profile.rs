//! # Signing Profiles
//!
//! CA configuration in the cfssl JSON shape:
//!
//! ```json
//! {
//!   "signing": {
//!     "default": { "expiry": "8760h" },
//!     "profiles": {
//!       "user": { "usages": ["signing", "key encipherment", "client auth"], "expiry": "720h" }
//!     }
//!   }
//! }
//! ```

use crate::domain::errors::CaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Profile under which end-user certificates are issued and checked.
pub const USER_PROFILE: &str = "user";

const DEFAULT_EXPIRY: Duration = Duration::from_secs(365 * 24 * 3600);
const USER_EXPIRY: Duration = Duration::from_secs(30 * 24 * 3600);

/// A key or extended key usage a profile grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Usage {
    #[serde(rename = "signing", alias = "digital signature")]
    Signing,
    #[serde(rename = "key encipherment")]
    KeyEncipherment,
    #[serde(rename = "cert sign")]
    CertSign,
    #[serde(rename = "crl sign")]
    CrlSign,
    #[serde(rename = "client auth")]
    ClientAuth,
    #[serde(rename = "server auth")]
    ServerAuth,
}

/// A named class of certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningProfile {
    #[serde(default)]
    pub usages: Vec<Usage>,
    #[serde(with = "crate::domain::duration", default = "default_expiry")]
    pub expiry: Duration,
}

fn default_expiry() -> Duration {
    DEFAULT_EXPIRY
}

impl Default for SigningProfile {
    fn default() -> Self {
        Self {
            usages: vec![Usage::Signing, Usage::KeyEncipherment],
            expiry: DEFAULT_EXPIRY,
        }
    }
}

impl SigningProfile {
    /// Client-auth profile used for end users.
    pub fn user() -> Self {
        Self {
            usages: vec![Usage::Signing, Usage::KeyEncipherment, Usage::ClientAuth],
            expiry: USER_EXPIRY,
        }
    }

    pub fn allows(&self, usage: Usage) -> bool {
        self.usages.contains(&usage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    #[serde(default)]
    pub default: SigningProfile,
    #[serde(default)]
    pub profiles: HashMap<String, SigningProfile>,
}

/// Parsed `ca_conf.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaConfig {
    pub signing: SigningConfig,
}

impl Default for CaConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(USER_PROFILE.to_string(), SigningProfile::user());
        Self {
            signing: SigningConfig {
                default: SigningProfile::default(),
                profiles,
            },
        }
    }
}

impl CaConfig {
    /// Decode and validate a JSON configuration.
    pub fn from_json(raw: &[u8]) -> Result<Self, CaError> {
        let config: Self =
            serde_json::from_slice(raw).map_err(|e| CaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, CaError> {
        serde_json::to_string_pretty(self).map_err(|e| CaError::Config(e.to_string()))
    }

    /// Look up a named profile.
    pub fn profile(&self, name: &str) -> Result<&SigningProfile, CaError> {
        self.signing
            .profiles
            .get(name)
            .ok_or_else(|| CaError::UnknownProfile(name.to_string()))
    }

    pub fn validate(&self) -> Result<(), CaError> {
        let profiles = std::iter::once(("default", &self.signing.default)).chain(
            self.signing
                .profiles
                .iter()
                .map(|(name, profile)| (name.as_str(), profile)),
        );

        for (name, profile) in profiles {
            if profile.expiry.is_zero() {
                return Err(CaError::Config(format!("profile '{name}' has a zero expiry")));
            }
        }
        Ok(())
    }
}
