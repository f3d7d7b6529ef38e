//! Serving: reconstruct `apply_single` from a frozen artifact alone.
//!
//! No batch, file, or network dependency. The context is read-only, so one
//! instance can serve unboundedly many concurrent calls behind an `Arc`.

use thiserror::Error;

use frieze_core::error::ValidationError;
use frieze_core::types::Record;
use frieze_transform::TransformError;

use crate::artifact::{ArtifactError, FrozenArtifact};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("record rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("transform: {0}")]
    Transform(#[from] TransformError),
}

pub struct ServingContext {
    artifact: FrozenArtifact,
}

impl ServingContext {
    pub fn new(artifact: FrozenArtifact) -> Self {
        Self { artifact }
    }

    /// Load from the persisted JSON form.
    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        Ok(Self::new(FrozenArtifact::from_json(text)?))
    }

    pub fn artifact(&self) -> &FrozenArtifact {
        &self.artifact
    }

    /// Transform one record exactly as the training-time transform phase
    /// would have. Unseen vocabulary strings map to the out-of-vocabulary
    /// index; the analyze phase is never re-entered.
    pub fn apply_single(&self, record: &Record) -> Result<Record, ServeError> {
        transform_one(&self.artifact, record)
    }
}

pub(crate) fn transform_one(
    artifact: &FrozenArtifact,
    record: &Record,
) -> Result<Record, ServeError> {
    artifact.input_schema.validate(record)?;
    Ok(artifact.transform.apply(record, &artifact.constants)?)
}
