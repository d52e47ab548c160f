//! # Certificate Issuer Subsystem (DG-02)
//!
//! Service-operated certificate authority. Issues short-lived client
//! certificates for verified DIDs and checks certificates presented at the
//! session gate.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): CSR requests, signing profiles, credentials
//! - **Ports Layer** (`ports/`): the `CertificateAuthority` trait
//! - **Adapters** (`adapters/`): `LocalCa` (rcgen signing, rustls verification)
//! - **Service Layer** (`service.rs`): `CertificateIssuer`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::LocalCa;
pub use domain::certificate::{common_name, decode_certificate};
pub use domain::credential::Credential;
pub use domain::csr::{render_user_csr, CaSpec, CsrRequest, KeySpec, NameEntry, USER_CSR_TEMPLATE};
pub use domain::errors::{CaError, IssuanceError};
pub use domain::duration::{format_duration, parse_duration};
pub use domain::profile::{CaConfig, SigningConfig, SigningProfile, Usage, USER_PROFILE};
pub use ports::outbound::CertificateAuthority;
pub use service::{CertificateIssuer, VerifiedCertificate};
