//! # didgate Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (hub fan-out, issuance)
//! └── src/integration/  # end-to-end scenarios over a real listener
//!     ├── fixtures.rs   # CA material, DID documents, running server
//!     ├── enrollment.rs # POST /enroll and the `enroll` command
//!     └── relay.rs      # GET /connect, hub relay, caller sessions
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dg-tests
//! cargo bench -p dg-tests
//! ```

pub mod integration;
