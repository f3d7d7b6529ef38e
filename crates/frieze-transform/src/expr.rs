//! The closed set of per-record output expressions.

use serde::{Deserialize, Serialize};

use frieze_analyzers::{AnalyzerKind, AnalyzerSpec};

/// One output field's recipe. Numeric expressions apply elementwise to
/// vector and variable-length fields, preserving the input arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum OutputExpr {
    /// `v - mean(field)`, frozen over the training batch.
    Center { field: String },

    /// `(v - min) / (max - min)`; 0.0 when the field is single-valued.
    Scale01 { field: String },

    /// String → vocabulary index; unseen strings map to the reserved
    /// out-of-vocabulary index.
    Integerize { field: String },

    /// Copy the input value through unchanged.
    Passthrough { field: String },
}

impl OutputExpr {
    /// The input field this expression reads.
    pub fn input_field(&self) -> &str {
        match self {
            OutputExpr::Center { field }
            | OutputExpr::Scale01 { field }
            | OutputExpr::Integerize { field }
            | OutputExpr::Passthrough { field } => field,
        }
    }

    /// The full-pass analyzer this expression depends on, if any.
    pub fn analyzer_spec(&self) -> Option<AnalyzerSpec> {
        match self {
            OutputExpr::Center { field } => Some(AnalyzerSpec::new(AnalyzerKind::Mean, field)),
            OutputExpr::Scale01 { field } => Some(AnalyzerSpec::new(AnalyzerKind::Scale01, field)),
            OutputExpr::Integerize { field } => {
                Some(AnalyzerSpec::new(AnalyzerKind::Vocabulary, field))
            }
            OutputExpr::Passthrough { .. } => None,
        }
    }
}
