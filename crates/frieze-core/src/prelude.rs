//! Convenient re-exports for downstream crates.

pub use crate::config::PipelineConfig;
pub use crate::error::{SchemaError, ValidationError, ValidationReason};
pub use crate::hash::{hash_serde, Hash256};
pub use crate::schema::{Arity, FieldSpec, Schema, ValueType};
pub use crate::types::{Batch, Record, Value};
