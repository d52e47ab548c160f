//! # Broadcast Hub
//!
//! The hub owns the registry of connected sessions and fans each inbound
//! message out to every other session. Each session is served by a read loop
//! and a write loop joined by a bounded outbound queue.

use std::time::Duration;

pub mod broadcaster;
pub mod session;

pub use broadcaster::{EvictionSignal, Hub, HubError, HubHandle, HubStats, SessionHandle, SessionQueue};
pub use session::run_session;

/// Per-session outbound queue capacity
pub const OUTBOUND_CAPACITY: usize = 256;

/// Hub control channel capacity
pub const CONTROL_BUFFER: usize = 1024;

/// Upper bound on the close handshake once a writer stops
pub const CLOSE_GRACE: Duration = Duration::from_secs(1);
