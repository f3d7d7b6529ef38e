#![forbid(unsafe_code)]
//! frieze: schema-driven two-phase feature preprocessing.
//!
//! Analyze once over a full batch, freeze the constants, transform every
//! record (and every future serving-time record) with the exact same logic.
//! The workspace member crates carry the implementation; this root crate
//! re-exports the public surface for convenience.

pub use frieze_analyzers::{
    Accumulator, AnalyzerError, AnalyzerKind, AnalyzerSpec, Constant, ConstantsTable, OOV_INDEX,
};
pub use frieze_core::prelude::*;
pub use frieze_pipeline::{
    ArtifactId, FrozenArtifact, Pipeline, PipelineError, RunOutput, ServeError, ServingContext,
    StateError,
};
pub use frieze_transform::{
    derive_output_schema, DeriveError, OutputDef, OutputExpr, TransformError, TransformFn,
};
