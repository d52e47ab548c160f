//! # Relay Gateway Subsystem (DG-03)
//!
//! Public surface of didgate: certificate enrollment for DID holders and a
//! certificate-gated websocket relay.
//!
//! ## Architecture
//!
//! ```text
//!  POST /enroll ──► IdentityVerifier (DG-01) ──► CertificateIssuer (DG-02)
//!
//!  GET /connect ──► CertificateIssuer::verify ──► websocket upgrade
//!                                                    │
//!                        ┌───────────────────────────┘
//!                        ▼
//!            read loop ──► Hub ──► outbound queue (256) ──► write loop
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use dg_03_relay_gateway::{GatewayConfig, RelayGatewayService};
//!
//! let config = GatewayConfig::load("didgate.toml")?;
//! RelayGatewayService::from_config(config)?.run().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod domain;
pub mod hub;
pub mod service;

pub use api::connect::CERTIFICATE_HEADER;
pub use api::{router, AppState};
pub use domain::config::{ConfigError, GatewayConfig, DEFAULT_BANNER, DEFAULT_PORT};
pub use domain::error::{EnrollmentError, GatewayError};
pub use domain::session_id::SessionId;
pub use domain::types::{EnrollmentRequest, EnrollmentResponse, HealthStatus, ServiceResponse};
pub use hub::{
    EvictionSignal, Hub, HubError, HubHandle, HubStats, SessionHandle, SessionQueue, OUTBOUND_CAPACITY,
};
pub use service::RelayGatewayService;

/// Crate version reported by `/health`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
