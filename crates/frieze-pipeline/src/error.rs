use thiserror::Error;

use frieze_analyzers::AnalyzerError;
use frieze_core::error::ValidationError;
use frieze_transform::{DeriveError, TransformError};

use crate::artifact::ArtifactError;
use crate::serve::ServeError;

/// Protocol violations: calling the orchestrator out of phase order.
/// Programmer errors, always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("pipeline is already frozen; a fresh instance is required per batch")]
    AlreadyFrozen,

    #[error("pipeline is not frozen yet; run the batch before applying single records")]
    NotFrozen,

    #[error("pipeline failed earlier and is not retryable")]
    Failed,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Aggregated per-record validation failures (with original batch
    /// indices), raised before the analyze phase under strict validation.
    #[error("{} record(s) failed validation", .0.len())]
    Validation(Vec<(usize, ValidationError)>),

    #[error("analyze phase: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("transform phase: {0}")]
    Transform(#[from] TransformError),

    #[error("output metadata: {0}")]
    Derive(#[from] DeriveError),

    /// A transformed record drifted from the derived output schema.
    #[error("output metadata drift at record {record}: {error}")]
    Metadata {
        record: usize,
        error: ValidationError,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("serving: {0}")]
    Serve(#[from] ServeError),
}
