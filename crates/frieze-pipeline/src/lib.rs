#![forbid(unsafe_code)]
//! frieze-pipeline: the analyze/transform orchestrator and serving surface.
//!
//! The orchestrator walks `Init → Analyzing → Transforming → Frozen`
//! exactly once per batch. Phase 1 is a sharded mergeable fold with a join
//! barrier before finalize; Phase 2 is a pure per-record map against the
//! frozen constants. The packaged artifact is everything a separate serving
//! process needs to run Phase 2 alone.

pub mod artifact;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod serve;

pub use artifact::{ArtifactError, ArtifactId, FrozenArtifact};
pub use error::{PipelineError, StateError};
pub use orchestrator::{Pipeline, RunOutput};
pub use serve::{ServeError, ServingContext};
