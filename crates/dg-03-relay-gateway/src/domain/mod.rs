//! # Domain Layer
//!
//! Configuration, errors, identifiers and wire types.

pub mod config;
pub mod error;
pub mod session_id;
pub mod types;
