//! Typed record values: the closed set of shapes the engine moves around.
//!
//! Records arrive already deserialized (ingestion is an external
//! collaborator), so `Value` is deliberately small: three scalar kinds and
//! their list forms. The untagged serde representation lets JSONL inputs
//! read naturally (`1.5`, `"hello"`, `[1, 2, 3]`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::ValueType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    I64(i64),
    F64(f64),
    Str(String),
    I64List(Vec<i64>),
    F64List(Vec<f64>),
    StrList(Vec<String>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::I64(_) | Value::I64List(_) => ValueType::Int,
            Value::F64(_) | Value::F64List(_) => ValueType::Float,
            Value::Str(_) | Value::StrList(_) => ValueType::Str,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Value::I64List(_) | Value::F64List(_) | Value::StrList(_)
        )
    }

    /// Element count for list values; `None` for scalars.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Value::I64List(v) => Some(v.len()),
            Value::F64List(v) => Some(v.len()),
            Value::StrList(v) => Some(v.len()),
            _ => None,
        }
    }
}

/// One input or output example: field name → typed value.
pub type Record = BTreeMap<String, Value>;

/// The complete set of records available during the analyze phase.
pub type Batch = Vec<Record>;
