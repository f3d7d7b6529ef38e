//! Vocabulary analyzer: frequency counts with first-seen ordering.
//!
//! Finalize sorts by descending frequency; ties break by the order a value
//! was first observed. Merging appends the right-hand accumulator's unseen
//! values after the left's, so first-seen order is shard order followed by
//! record order within a shard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::registry::AnalyzerError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabAcc {
    counts: HashMap<String, u64>,
    /// First-seen order; every key in `counts` appears here exactly once.
    order: Vec<String>,
}

impl VocabAcc {
    pub fn push(&mut self, v: &str) {
        match self.counts.get_mut(v) {
            Some(c) => *c += 1,
            None => {
                self.counts.insert(v.to_string(), 1);
                self.order.push(v.to_string());
            }
        }
    }

    pub fn merge(&mut self, other: VocabAcc) {
        for key in other.order {
            let n = other.counts[&key];
            match self.counts.get_mut(&key) {
                Some(c) => *c += n,
                None => {
                    self.counts.insert(key.clone(), n);
                    self.order.push(key);
                }
            }
        }
    }

    pub fn finalize(self, field: &str) -> Result<Vec<String>, AnalyzerError> {
        if self.order.is_empty() {
            return Err(AnalyzerError::EmptyInput(format!(
                "vocabulary over field '{field}' saw no values"
            )));
        }
        let mut ranked: Vec<(usize, String)> = self.order.into_iter().enumerate().collect();
        ranked.sort_by(|(ia, a), (ib, b)| {
            self.counts[b]
                .cmp(&self.counts[a])
                .then_with(|| ia.cmp(ib))
        });
        Ok(ranked.into_iter().map(|(_, key)| key).collect())
    }
}
