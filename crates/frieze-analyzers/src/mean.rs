//! Mean analyzer: (sum, count) accumulator.

use serde::{Deserialize, Serialize};

use crate::registry::AnalyzerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanAcc {
    pub sum: f64,
    pub count: u64,
}

impl MeanAcc {
    pub fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    pub fn merge(&mut self, other: MeanAcc) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn finalize(self, field: &str) -> Result<f64, AnalyzerError> {
        if self.count == 0 {
            return Err(AnalyzerError::EmptyInput(format!(
                "mean over field '{field}' saw no values"
            )));
        }
        Ok(self.sum / self.count as f64)
    }
}
