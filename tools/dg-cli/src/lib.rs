//! didgate command line tooling.
//!
//! Subcommands live in [`commands`]; the interactive relay client is in
//! [`session`].

pub mod commands;
pub mod session;

pub use commands::{init_logging, Cli};
pub use session::{CallerSession, SessionError};
