//! Command line surface of `didgate`.
//!
//! Every flag can also be supplied through a `SUSS_*` environment variable.

pub mod ca;
pub mod connect;
pub mod enroll;
pub mod server;
pub mod version;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// didgate: DID-authenticated certificate enrollment and relay
#[derive(Parser, Debug)]
#[command(name = "didgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "SUSS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the enrollment and relay service
    Server(server::ServerArgs),
    /// Enroll a given DID with the service
    Enroll(enroll::EnrollArgs),
    /// Connect to the relay service
    Connect(connect::ConnectArgs),
    /// Create a new root certificate authority
    RootCa(ca::RootCaArgs),
    /// Sign a certificate request with the local CA
    UserCert(ca::UserCertArgs),
    /// Print version information
    Version,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Command::Server(args) => server::run(args).await,
            Command::Enroll(args) => enroll::run(args).await.map(|_| ()),
            Command::Connect(args) => connect::run(args).await,
            Command::RootCa(args) => ca::root_ca(args),
            Command::UserCert(args) => ca::user_cert(args),
            Command::Version => {
                version::print();
                Ok(())
            }
        }
    }
}

/// Install the global fmt subscriber.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Write key material readable by the owner only.
pub(crate) fn write_read_only(path: &Path, contents: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o400);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))
}
