//! Analyzer identities and the closed accumulator dispatch.
//!
//! `AnalyzerSpec` names one reduction over one field; the pipeline discovers
//! the distinct specs a transform references and runs exactly those.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use frieze_core::types::Value;

use crate::constants::Constant;
use crate::mean::MeanAcc;
use crate::minmax::MinMaxAcc;
use crate::vocab::VocabAcc;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("unsupported field: {0}")]
    UnsupportedField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnalyzerKind {
    Mean,
    Min,
    Max,
    Scale01,
    Vocabulary,
}

impl AnalyzerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::Mean => "mean",
            AnalyzerKind::Min => "min",
            AnalyzerKind::Max => "max",
            AnalyzerKind::Scale01 => "scale_0_1",
            AnalyzerKind::Vocabulary => "vocabulary",
        }
    }
}

/// One analyzer applied to one input field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalyzerSpec {
    pub kind: AnalyzerKind,
    pub field: String,
}

impl AnalyzerSpec {
    pub fn new(kind: AnalyzerKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
        }
    }

    /// Stable string form, used as the constants-table key.
    pub fn key(&self) -> String {
        format!("{}({})", self.kind.as_str(), self.field)
    }
}

/// Partial state of one running analyzer. Closed dispatch over the analyzer
/// kinds; partials over disjoint record slices combine via `merge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Accumulator {
    Mean(MeanAcc),
    MinMax(MinMaxAcc),
    Vocab(VocabAcc),
}

impl Accumulator {
    pub fn seed(kind: AnalyzerKind) -> Self {
        match kind {
            AnalyzerKind::Mean => Accumulator::Mean(MeanAcc::default()),
            AnalyzerKind::Min | AnalyzerKind::Max | AnalyzerKind::Scale01 => {
                Accumulator::MinMax(MinMaxAcc::default())
            }
            AnalyzerKind::Vocabulary => Accumulator::Vocab(VocabAcc::default()),
        }
    }

    /// Fold one field value in. List values fold elementwise, so scalar and
    /// vector fields share one contract.
    pub fn accumulate(&mut self, field: &str, value: &Value) -> Result<(), AnalyzerError> {
        match self {
            Accumulator::Mean(acc) => {
                for v in numeric_values(field, value)? {
                    acc.push(v);
                }
            }
            Accumulator::MinMax(acc) => {
                for v in numeric_values(field, value)? {
                    acc.push(v);
                }
            }
            Accumulator::Vocab(acc) => {
                for s in string_values(field, value)? {
                    acc.push(s);
                }
            }
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Accumulator) -> Result<(), AnalyzerError> {
        match (self, other) {
            (Accumulator::Mean(a), Accumulator::Mean(b)) => a.merge(b),
            (Accumulator::MinMax(a), Accumulator::MinMax(b)) => a.merge(b),
            (Accumulator::Vocab(a), Accumulator::Vocab(b)) => a.merge(b),
            _ => {
                return Err(AnalyzerError::TypeMismatch(
                    "cannot merge accumulators of different analyzer kinds".to_string(),
                ))
            }
        }
        Ok(())
    }

    pub fn finalize(self, spec: &AnalyzerSpec) -> Result<Constant, AnalyzerError> {
        match (self, spec.kind) {
            (Accumulator::Mean(acc), AnalyzerKind::Mean) => {
                Ok(Constant::Scalar(acc.finalize(&spec.field)?))
            }
            (Accumulator::MinMax(acc), AnalyzerKind::Min) => {
                Ok(Constant::Scalar(acc.finalize(&spec.field)?.0))
            }
            (Accumulator::MinMax(acc), AnalyzerKind::Max) => {
                Ok(Constant::Scalar(acc.finalize(&spec.field)?.1))
            }
            (Accumulator::MinMax(acc), AnalyzerKind::Scale01) => {
                let (min, max) = acc.finalize(&spec.field)?;
                Ok(Constant::Range { min, max })
            }
            (Accumulator::Vocab(acc), AnalyzerKind::Vocabulary) => {
                Ok(Constant::Vocabulary(acc.finalize(&spec.field)?))
            }
            _ => Err(AnalyzerError::TypeMismatch(format!(
                "accumulator does not match analyzer {}",
                spec.key()
            ))),
        }
    }
}

fn numeric_values(field: &str, value: &Value) -> Result<Vec<f64>, AnalyzerError> {
    match value {
        Value::F64(v) => Ok(vec![*v]),
        Value::I64(v) => Ok(vec![*v as f64]),
        Value::F64List(vs) => Ok(vs.clone()),
        Value::I64List(vs) => Ok(vs.iter().map(|&v| v as f64).collect()),
        Value::Str(_) | Value::StrList(_) => Err(AnalyzerError::TypeMismatch(format!(
            "field '{field}' holds strings; a numeric analyzer cannot fold it"
        ))),
    }
}

fn string_values<'a>(field: &str, value: &'a Value) -> Result<Vec<&'a str>, AnalyzerError> {
    match value {
        Value::Str(s) => Ok(vec![s.as_str()]),
        Value::StrList(ss) => Ok(ss.iter().map(|s| s.as_str()).collect()),
        _ => Err(AnalyzerError::TypeMismatch(format!(
            "field '{field}' is numeric; the vocabulary analyzer folds strings"
        ))),
    }
}
