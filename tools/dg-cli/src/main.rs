//! didgate: DID-authenticated certificate enrollment and relay.
//!
//! ## Usage
//!
//! ```bash
//! # Create the CA and start the service
//! didgate root-ca root_csr.json
//! didgate server --port 9090
//!
//! # Enroll a DID and join the relay
//! didgate enroll --did did:bryk:abc123 --challenge xyz --signature sig.json \
//!     --endpoint http://localhost:9090
//! didgate connect localhost:9090 --cert abc123.crt
//! ```

use clap::Parser;
use dg_cli::{init_logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let code = match cli.execute().await {
        Ok(()) => 0,
        Err(e) => {
            println!("{e:#}");
            1
        }
    };

    // Exit without waiting on the blocking stdin reader of a finished session.
    std::process::exit(code);
}
