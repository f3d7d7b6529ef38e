//! Minimal YAML → (Schema, TransformFn) parser for pipeline files.
//!
//! Example:
//! ```yaml
//! schema:
//!   - { name: "x", type: "float" }
//!   - { name: "s", type: "str" }
//!   - { name: "tags", type: "str", arity: "varlen", required: false }
//! outputs:
//!   - { name: "x_centered", op: "center", field: "x" }
//!   - { name: "x_scaled", op: "scale_0_1", field: "x" }
//!   - { name: "s_id", op: "integerize", field: "s" }
//!   - { name: "tags_raw", op: "passthrough", field: "tags" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use frieze_core::error::SchemaError;
use frieze_core::schema::{Arity, FieldSpec, Schema, ValueType};

use crate::expr::OutputExpr;
use crate::function::{OutputDef, TransformFn};

#[derive(Debug, Error)]
pub enum DslError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("field '{field}': unknown type '{value}'")]
    UnknownType { field: String, value: String },

    #[error("field '{field}': unknown arity '{value}'")]
    UnknownArity { field: String, value: String },

    #[error("output '{output}': unknown op '{op}'")]
    UnknownOp { output: String, op: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDecl {
    pub schema: Vec<FieldDef>,
    pub outputs: Vec<OutputDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    /// "scalar" (default), "vector:N", or "varlen".
    #[serde(default)]
    pub arity: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDecl {
    pub name: String,
    pub op: String,
    pub field: String,
}

pub fn parse_yaml_pipeline(text: &str) -> Result<(Schema, TransformFn), DslError> {
    let decl: PipelineDecl = serde_yaml::from_str(text)?;
    decl.into_parts()
}

impl PipelineDecl {
    pub fn into_parts(self) -> Result<(Schema, TransformFn), DslError> {
        let mut fields = Vec::with_capacity(self.schema.len());
        for def in self.schema {
            let value_type = parse_vtype(&def.name, &def.value_type)?;
            let arity = parse_arity(&def.name, def.arity.as_deref())?;
            fields.push(FieldSpec {
                name: def.name,
                value_type,
                arity,
                required: def.required,
            });
        }
        let schema = Schema::build(fields)?;

        let mut outputs = Vec::with_capacity(self.outputs.len());
        for decl in self.outputs {
            let expr = match decl.op.as_str() {
                "center" => OutputExpr::Center { field: decl.field },
                "scale_0_1" | "scale01" => OutputExpr::Scale01 { field: decl.field },
                "integerize" | "vocabulary" => OutputExpr::Integerize { field: decl.field },
                "passthrough" | "copy" => OutputExpr::Passthrough { field: decl.field },
                other => {
                    return Err(DslError::UnknownOp {
                        output: decl.name,
                        op: other.to_string(),
                    })
                }
            };
            outputs.push(OutputDef {
                name: decl.name,
                expr,
            });
        }

        Ok((schema, TransformFn::new(outputs)))
    }
}

fn parse_vtype(field: &str, s: &str) -> Result<ValueType, DslError> {
    match s {
        "float" | "f64" | "Float" => Ok(ValueType::Float),
        "int" | "i64" | "Int" => Ok(ValueType::Int),
        "str" | "string" | "bytes" | "Str" => Ok(ValueType::Str),
        other => Err(DslError::UnknownType {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

fn parse_arity(field: &str, s: Option<&str>) -> Result<Arity, DslError> {
    match s {
        None | Some("scalar") => Ok(Arity::Scalar),
        Some("varlen") => Ok(Arity::VarLen),
        Some(other) => {
            if let Some(n) = other.strip_prefix("vector:") {
                if let Ok(n) = n.parse::<usize>() {
                    return Ok(Arity::Vector(n));
                }
            }
            Err(DslError::UnknownArity {
                field: field.to_string(),
                value: other.to_string(),
            })
        }
    }
}
