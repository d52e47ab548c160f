//! # Adapters
//!
//! Concrete [`DidResolver`](crate::ports::outbound::DidResolver) implementations.

pub mod http;
pub mod memory;

pub use http::{HttpDidResolver, DEFAULT_RESOLVER_ENDPOINT};
pub use memory::MemoryDidResolver;
