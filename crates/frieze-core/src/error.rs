use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{Arity, ValueType};

/// Malformed schema: a user configuration fault, raised before any record
/// is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("field '{0}' declares a zero-length vector")]
    ZeroLengthVector(String),

    #[error("field name must be non-empty")]
    EmptyName,
}

/// Why a record failed validation against its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationReason {
    MissingRequired,
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
    ArityMismatch {
        expected: Arity,
    },
    UndeclaredField,
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::MissingRequired => write!(f, "required field is missing"),
            ValidationReason::TypeMismatch { expected, found } => {
                write!(f, "expected {:?}, found {:?}", expected, found)
            }
            ValidationReason::ArityMismatch { expected } => {
                write!(f, "value shape does not match declared arity {:?}", expected)
            }
            ValidationReason::UndeclaredField => write!(f, "field is not declared in the schema"),
        }
    }
}

/// One record/field validation failure. Reported per record and aggregated
/// by the pipeline; never silently dropped.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("field '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}
