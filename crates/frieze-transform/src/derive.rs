//! Output-metadata derivation: infer the transformed schema from the
//! transform function's declarations, before any record is transformed.
//!
//! The pipeline validates every Phase-2 output against this schema; a
//! record that drifts from it is a metadata error, since the frozen
//! artifact's output schema would otherwise be ambiguous.

use thiserror::Error;

use frieze_core::error::SchemaError;
use frieze_core::schema::{FieldSpec, Schema, ValueType};

use crate::expr::OutputExpr;
use crate::function::TransformFn;

#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("output '{output}' reads undeclared field '{field}'")]
    UnknownField { output: String, field: String },

    #[error("output '{output}': {detail}")]
    TypeIncompatible { output: String, detail: String },

    #[error("two outputs share the name '{0}'")]
    DuplicateOutput(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// One FieldSpec per declared output, typed from what the expression
/// produces and shaped by the input field's arity.
pub fn derive_output_schema(input: &Schema, func: &TransformFn) -> Result<Schema, DeriveError> {
    let mut fields = Vec::with_capacity(func.outputs.len());
    for def in &func.outputs {
        if fields.iter().any(|f: &FieldSpec| f.name == def.name) {
            return Err(DeriveError::DuplicateOutput(def.name.clone()));
        }
        let in_field = def.expr.input_field();
        let Some(spec) = input.field(in_field) else {
            return Err(DeriveError::UnknownField {
                output: def.name.clone(),
                field: in_field.to_string(),
            });
        };
        let value_type = match &def.expr {
            OutputExpr::Center { .. } | OutputExpr::Scale01 { .. } => {
                if spec.value_type == ValueType::Str {
                    return Err(DeriveError::TypeIncompatible {
                        output: def.name.clone(),
                        detail: format!("numeric expression over string field '{in_field}'"),
                    });
                }
                ValueType::Float
            }
            OutputExpr::Integerize { .. } => {
                if spec.value_type != ValueType::Str {
                    return Err(DeriveError::TypeIncompatible {
                        output: def.name.clone(),
                        detail: format!("integerize over non-string field '{in_field}'"),
                    });
                }
                ValueType::Int
            }
            OutputExpr::Passthrough { .. } => spec.value_type,
        };
        fields.push(FieldSpec {
            name: def.name.clone(),
            value_type,
            arity: spec.arity,
            required: spec.required,
        });
    }
    Ok(Schema::build(fields)?)
}
