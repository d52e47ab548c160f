//! Gateway configuration with validation.
//!
//! Loaded from an optional TOML file; every section falls back to defaults.
//!
//! ```toml
//! [http]
//! host = "0.0.0.0"
//! port = 9090
//!
//! [timeouts]
//! request = "15s"
//!
//! [hub]
//! outbound_capacity = 256
//! ```

use dg_01_identity::DEFAULT_RESOLVER_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default service port
pub const DEFAULT_PORT: u16 = 9090;

/// Default catch-all banner
pub const DEFAULT_BANNER: &str = "SUSS workshop sample service =D";

/// Main gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener
    pub http: HttpConfig,
    /// Request timeouts
    pub timeouts: TimeoutConfig,
    /// Request size limits
    pub limits: LimitsConfig,
    /// Broadcast hub sizing
    pub hub: HubConfig,
    /// Certificate authority material
    pub ca: CaPaths,
    /// DID resolution
    pub resolver: ResolverConfig,
    /// Service identity
    pub service: ServiceConfig,
}

impl GatewayConfig {
    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        if self.resolver.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "resolver timeout cannot be 0".into(),
            ));
        }

        if self.limits.max_enrollment_body == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_enrollment_body cannot be 0".into(),
            ));
        }

        if self.hub.outbound_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(
                "outbound_capacity cannot be 0".into(),
            ));
        }

        if self.hub.control_buffer == 0 {
            return Err(ConfigError::InvalidCapacity(
                "control_buffer cannot be 0".into(),
            ));
        }

        if self.resolver.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("resolver endpoint is required".into()));
        }

        Ok(())
    }

    /// HTTP bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 9090, 0 picks an ephemeral port)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on HTTP request handling; upgraded sessions are not affected
    #[serde(with = "dg_02_certificate_issuer::domain::duration")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(15),
        }
    }
}

/// Request limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max enrollment body size in bytes (default: 64KiB)
    pub max_enrollment_body: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_enrollment_body: 64 * 1024,
        }
    }
}

/// Broadcast hub sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Per-session outbound queue capacity
    pub outbound_capacity: usize,
    /// Hub control channel capacity
    pub control_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: crate::hub::OUTBOUND_CAPACITY,
            control_buffer: crate::hub::CONTROL_BUFFER,
        }
    }
}

/// Locations of the CA certificate, key and signing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub config_path: PathBuf,
}

impl Default for CaPaths {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("root-ca.crt"),
            key_path: PathBuf::from("root-ca.pem"),
            config_path: PathBuf::from("ca_conf.json"),
        }
    }
}

/// DID resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Retrieval endpoint, queried with `?subject=<subject>`
    pub endpoint: String,
    #[serde(with = "dg_02_certificate_issuer::domain::duration")]
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RESOLVER_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Body of the catch-all response
    pub banner: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {error}")]
    Io { path: String, error: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
