//! # Ports Layer
//!
//! Interfaces this subsystem depends on.

pub mod outbound;
