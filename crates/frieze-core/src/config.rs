//! Pipeline configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// When false (the default), any record failing validation aborts the
    /// run before the analyze phase, with every failure reported. When
    /// true, invalid records are excluded from both phases and reported
    /// alongside the output.
    pub lenient: bool,

    /// Number of shards the analyze-phase fold is split across. Each shard
    /// folds a contiguous slice of the batch into partial accumulators,
    /// merged in shard order.
    pub analyze_shards: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lenient: false,
            analyze_shards: 1,
        }
    }
}

impl PipelineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `FRIEZE_LENIENT`: "1"/"true" enables lenient validation
    /// - `FRIEZE_ANALYZE_SHARDS`: shard count for the analyze fold
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("FRIEZE_LENIENT") {
            cfg.lenient = s == "1" || s.eq_ignore_ascii_case("true");
        }

        if let Ok(s) = std::env::var("FRIEZE_ANALYZE_SHARDS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.analyze_shards = v.max(1);
            }
        }

        cfg
    }
}
