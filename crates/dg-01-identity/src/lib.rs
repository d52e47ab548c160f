//! # DID Identity Subsystem (DG-01)
//!
//! Resolves decentralized identifiers and verifies challenge signatures made
//! with the identity's master key.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): DID parsing, documents, signatures, no I/O
//! - **Ports Layer** (`ports/`): the `DidResolver` trait
//! - **Adapters** (`adapters/`): HTTP and in-memory resolvers
//! - **Service Layer** (`service.rs`): `IdentityVerifier`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{HttpDidResolver, MemoryDidResolver, DEFAULT_RESOLVER_ENDPOINT};
pub use domain::did::{Did, SUPPORTED_METHOD};
pub use domain::document::{DidDocument, PublicKeyEntry, ED25519_KEY_TYPE};
pub use domain::errors::IdentityError;
pub use domain::identity::{Identity, MASTER_KEY};
pub use domain::signature::{verify_challenge, SignatureLd, ED25519_SIGNATURE_TYPE};
pub use ports::outbound::DidResolver;
pub use service::IdentityVerifier;
