#![forbid(unsafe_code)]
//! frieze-analyzers: full-pass reductions over a batch, one frozen constant each.
//!
//! Design intent:
//! - Every analyzer is a mergeable fold: `seed` → `accumulate`* → `merge`*
//!   → `finalize`. Partial accumulators over disjoint slices of a batch
//!   merge into the same result as a single sequential fold, so the full
//!   pass can be sharded by the pipeline or an external batch engine.
//! - The analyzer set is a closed tagged enum rather than trait objects;
//!   the set is small and fixed, and closed dispatch keeps accumulators
//!   serializable and mergeable by construction.

pub mod constants;
pub mod mean;
pub mod minmax;
pub mod registry;
pub mod vocab;

pub use constants::{Constant, ConstantsTable, OOV_INDEX};
pub use registry::{Accumulator, AnalyzerError, AnalyzerKind, AnalyzerSpec};
