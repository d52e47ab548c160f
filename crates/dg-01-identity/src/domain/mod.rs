//! # Domain Layer
//!
//! DID parsing, documents, signatures and the resolved identity. No I/O.

pub mod did;
pub mod document;
pub mod errors;
pub mod identity;
pub mod signature;
