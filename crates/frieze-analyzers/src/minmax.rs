//! Min/max extrema accumulator, shared by MIN, MAX, and SCALE_0_1.

use serde::{Deserialize, Serialize};

use crate::registry::AnalyzerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxAcc {
    min: f64,
    max: f64,
    seen: bool,
}

impl MinMaxAcc {
    pub fn push(&mut self, v: f64) {
        if !self.seen {
            self.min = v;
            self.max = v;
            self.seen = true;
        } else {
            if v < self.min {
                self.min = v;
            }
            if v > self.max {
                self.max = v;
            }
        }
    }

    pub fn merge(&mut self, other: MinMaxAcc) {
        if !other.seen {
            return;
        }
        if !self.seen {
            *self = other;
            return;
        }
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
    }

    pub fn finalize(self, field: &str) -> Result<(f64, f64), AnalyzerError> {
        if !self.seen {
            return Err(AnalyzerError::EmptyInput(format!(
                "min/max over field '{field}' saw no values"
            )));
        }
        Ok((self.min, self.max))
    }
}
