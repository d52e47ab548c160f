//! # Domain Layer
//!
//! Requests, profiles and credentials. No I/O.

pub mod certificate;
pub mod credential;
pub mod csr;
pub mod duration;
pub mod errors;
pub mod profile;
