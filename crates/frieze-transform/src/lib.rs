#![forbid(unsafe_code)]
//! frieze-transform: the per-record half of the two-phase contract.
//!
//! A transform function is data, not code: an ordered list of output
//! expressions drawn from a closed set. That buys three things at once —
//! the analyzer dependencies can be discovered statically before the
//! analyze phase runs, the function serializes into the frozen artifact
//! verbatim, and applying it is pure by construction.

pub mod derive;
pub mod dsl;
pub mod expr;
pub mod function;

pub use derive::{derive_output_schema, DeriveError};
pub use expr::OutputExpr;
pub use function::{OutputDef, TransformError, TransformFn};
