//! Frozen analyzer outputs: the constants table shared by every
//! transform invocation, at training time and forever after at serving.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::AnalyzerSpec;

/// Index assigned to categorical values never observed during the analyze
/// phase. Serving-time lookups of unseen strings return this instead of
/// failing.
pub const OOV_INDEX: i64 = -1;

/// One analyzer's frozen output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Scalar(f64),
    Range { min: f64, max: f64 },
    /// Ordered vocabulary; a string's index is its position.
    Vocabulary(Vec<String>),
}

/// Analyzer spec → constant, created exactly once per batch by the analyze
/// phase and immutable afterwards. Keyed by the spec's stable string form
/// so the table serializes as a plain JSON object inside the artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantsTable {
    entries: BTreeMap<String, Constant>,
}

impl ConstantsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: &AnalyzerSpec, constant: Constant) {
        self.entries.insert(spec.key(), constant);
    }

    pub fn get(&self, spec: &AnalyzerSpec) -> Option<&Constant> {
        self.entries.get(&spec.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
