//! The transform function: (record, constants) → output record.
//!
//! Pure and stateless. All full-pass aggregation happens through declared
//! analyzer references; applying the same record against the same constants
//! twice yields bit-identical output, which is the train/serve guarantee.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use frieze_analyzers::{AnalyzerKind, AnalyzerSpec, Constant, ConstantsTable, OOV_INDEX};
use frieze_core::types::{Record, Value};

use crate::expr::OutputExpr;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("no constant for analyzer {0}; was the analyze phase run?")]
    MissingConstant(String),

    #[error("constant kind mismatch for analyzer {0}")]
    ConstantMismatch(String),

    #[error("field '{field}': {detail}")]
    BadInput { field: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDef {
    pub name: String,
    #[serde(flatten)]
    pub expr: OutputExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformFn {
    pub outputs: Vec<OutputDef>,
}

impl TransformFn {
    pub fn new(outputs: Vec<OutputDef>) -> Self {
        Self { outputs }
    }

    /// The distinct analyzers this function references, in declaration
    /// order. Only these run during the analyze phase.
    pub fn analyzer_specs(&self) -> Vec<AnalyzerSpec> {
        let mut specs: Vec<AnalyzerSpec> = Vec::new();
        for def in &self.outputs {
            if let Some(spec) = def.expr.analyzer_spec() {
                if !specs.contains(&spec) {
                    specs.push(spec);
                }
            }
        }
        specs
    }

    /// Apply the per-record half. A missing optional input field is simply
    /// absent from the output; presence of required fields is the
    /// validator's job, not ours.
    pub fn apply(
        &self,
        record: &Record,
        constants: &ConstantsTable,
    ) -> Result<Record, TransformError> {
        let mut out = Record::new();
        for def in &self.outputs {
            let field = def.expr.input_field();
            let Some(value) = record.get(field) else {
                continue;
            };
            let produced = eval(&def.expr, value, constants)?;
            out.insert(def.name.clone(), produced);
        }
        Ok(out)
    }
}

fn eval(
    expr: &OutputExpr,
    value: &Value,
    constants: &ConstantsTable,
) -> Result<Value, TransformError> {
    match expr {
        OutputExpr::Passthrough { .. } => Ok(value.clone()),

        OutputExpr::Center { field } => {
            let spec = AnalyzerSpec::new(AnalyzerKind::Mean, field);
            let mean = match lookup(constants, &spec)? {
                Constant::Scalar(m) => *m,
                _ => return Err(TransformError::ConstantMismatch(spec.key())),
            };
            map_numeric(field, value, |v| v - mean)
        }

        OutputExpr::Scale01 { field } => {
            let spec = AnalyzerSpec::new(AnalyzerKind::Scale01, field);
            let (min, max) = match lookup(constants, &spec)? {
                Constant::Range { min, max } => (*min, *max),
                _ => return Err(TransformError::ConstantMismatch(spec.key())),
            };
            let span = max - min;
            // A single-valued field scales to 0.0 rather than dividing by zero.
            map_numeric(field, value, move |v| {
                if span == 0.0 {
                    0.0
                } else {
                    (v - min) / span
                }
            })
        }

        OutputExpr::Integerize { field } => {
            let spec = AnalyzerSpec::new(AnalyzerKind::Vocabulary, field);
            let vocab = match lookup(constants, &spec)? {
                Constant::Vocabulary(v) => v,
                _ => return Err(TransformError::ConstantMismatch(spec.key())),
            };
            map_strings(field, value, |s| {
                vocab
                    .iter()
                    .position(|entry| entry == s)
                    .map(|i| i as i64)
                    .unwrap_or(OOV_INDEX)
            })
        }
    }
}

fn lookup<'c>(
    constants: &'c ConstantsTable,
    spec: &AnalyzerSpec,
) -> Result<&'c Constant, TransformError> {
    constants
        .get(spec)
        .ok_or_else(|| TransformError::MissingConstant(spec.key()))
}

fn map_numeric(
    field: &str,
    value: &Value,
    f: impl Fn(f64) -> f64,
) -> Result<Value, TransformError> {
    match value {
        Value::F64(v) => Ok(Value::F64(f(*v))),
        Value::I64(v) => Ok(Value::F64(f(*v as f64))),
        Value::F64List(vs) => Ok(Value::F64List(vs.iter().map(|&v| f(v)).collect())),
        Value::I64List(vs) => Ok(Value::F64List(vs.iter().map(|&v| f(v as f64)).collect())),
        Value::Str(_) | Value::StrList(_) => Err(TransformError::BadInput {
            field: field.to_string(),
            detail: "numeric expression over a string field".to_string(),
        }),
    }
}

fn map_strings(
    field: &str,
    value: &Value,
    f: impl Fn(&str) -> i64,
) -> Result<Value, TransformError> {
    match value {
        Value::Str(s) => Ok(Value::I64(f(s))),
        Value::StrList(ss) => Ok(Value::I64List(ss.iter().map(|s| f(s)).collect())),
        _ => Err(TransformError::BadInput {
            field: field.to_string(),
            detail: "integerize over a non-string field".to_string(),
        }),
    }
}
