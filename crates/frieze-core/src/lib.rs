#![forbid(unsafe_code)]
//! frieze-core: schema model, typed values, error taxonomy, config, hashing.
//!
//! Design intent:
//! - Pure data and validation; no I/O, no threads, no analyzer logic.
//! - Everything here is serde-serializable so the frozen artifact can embed
//!   schemas verbatim.

pub mod config;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod schema;
pub mod types;

/// Engine version recorded in frozen artifacts for provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
