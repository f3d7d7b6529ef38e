//! Logical schema types and record validation. Pure data; no I/O here.
//!
//! A `Schema` is built once, before any record is read, and is immutable
//! thereafter. Both the training batch and every serving-time record are
//! validated against the same schema, which is what makes the two phases
//! agree on field shapes.

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, ValidationError, ValidationReason};
use crate::types::{Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Float,
    Int,
    Str,
}

/// Concrete storage shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Scalar,
    /// Fixed-length vector; length must be >= 1.
    Vector(usize),
    VarLen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub value_type: ValueType,
    pub arity: Arity,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType, arity: Arity) -> Self {
        Self {
            name: name.into(),
            value_type,
            arity,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema, rejecting duplicate names and malformed specs.
    pub fn build(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for (i, f) in fields.iter().enumerate() {
            if f.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if let Arity::Vector(0) = f.arity {
                return Err(SchemaError::ZeroLengthVector(f.name.clone()));
            }
            if fields[..i].iter().any(|g| g.name == f.name) {
                return Err(SchemaError::DuplicateField(f.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check one record: required presence, value type, arity/shape.
    ///
    /// The first violation is returned; callers that want every violation in
    /// a batch collect per record.
    pub fn validate(&self, record: &Record) -> Result<(), ValidationError> {
        for spec in &self.fields {
            match record.get(&spec.name) {
                None if spec.required => {
                    return Err(ValidationError {
                        field: spec.name.clone(),
                        reason: ValidationReason::MissingRequired,
                    })
                }
                None => {}
                Some(value) => check_value(spec, value)?,
            }
        }
        // Undeclared fields have no spec to check against; reject rather
        // than let train and serve inputs drift apart.
        for name in record.keys() {
            if self.field(name).is_none() {
                return Err(ValidationError {
                    field: name.clone(),
                    reason: ValidationReason::UndeclaredField,
                });
            }
        }
        Ok(())
    }
}

fn check_value(spec: &FieldSpec, value: &Value) -> Result<(), ValidationError> {
    if value.value_type() != spec.value_type {
        return Err(ValidationError {
            field: spec.name.clone(),
            reason: ValidationReason::TypeMismatch {
                expected: spec.value_type,
                found: value.value_type(),
            },
        });
    }
    let shape_ok = match spec.arity {
        Arity::Scalar => !value.is_list(),
        Arity::Vector(n) => value.list_len() == Some(n),
        Arity::VarLen => value.is_list(),
    };
    if !shape_ok {
        return Err(ValidationError {
            field: spec.name.clone(),
            reason: ValidationReason::ArityMismatch {
                expected: spec.arity,
            },
        });
    }
    Ok(())
}
