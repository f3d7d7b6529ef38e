//! The frozen artifact: everything serving needs, nothing it doesn't.
//!
//! Serializes to a single JSON document holding the input schema, the
//! derived output schema, every analyzer constant (full vocabularies
//! included), and the transform declaration itself. A serving process
//! reconstructs `apply_single` from this alone; the training batch is
//! never needed again.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use frieze_analyzers::ConstantsTable;
use frieze_core::hash::{hash_serde, Hash256};
use frieze_core::schema::Schema;
use frieze_transform::TransformFn;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact serialization: {0}")]
    Serialize(String),

    #[error("artifact deserialization: {0}")]
    Deserialize(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub Uuid);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenArtifact {
    pub id: ArtifactId,

    /// Engine version string for provenance.
    pub engine_version: String,

    pub input_schema: Schema,
    pub output_schema: Schema,
    pub constants: ConstantsTable,

    /// The transform logic itself; declarative, so it travels whole.
    pub transform: TransformFn,

    /// Stable hash of the transform declaration, for quick equality checks
    /// between training and serving deployments.
    pub transform_hash: Hash256,

    /// Milliseconds since Unix epoch (UTC) at freeze time.
    pub created_ms: u64,
}

impl FrozenArtifact {
    pub fn new(
        input_schema: Schema,
        output_schema: Schema,
        constants: ConstantsTable,
        transform: TransformFn,
    ) -> Result<Self, ArtifactError> {
        let transform_hash =
            hash_serde(&transform).map_err(|e| ArtifactError::Serialize(e.to_string()))?;
        Ok(Self {
            id: ArtifactId(Uuid::new_v4()),
            engine_version: frieze_core::VERSION.to_string(),
            input_schema,
            output_schema,
            constants,
            transform,
            transform_hash,
            created_ms: now_ms(),
        })
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        serde_json::to_string_pretty(self).map_err(|e| ArtifactError::Serialize(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        serde_json::from_str(text).map_err(|e| ArtifactError::Deserialize(e.to_string()))
    }

    /// Content digest over the whole artifact.
    pub fn digest(&self) -> Result<Hash256, ArtifactError> {
        hash_serde(self).map_err(|e| ArtifactError::Serialize(e.to_string()))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
