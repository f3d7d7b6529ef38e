//! Declarative pipeline files.

pub mod yaml;

pub use yaml::{parse_yaml_pipeline, DslError, PipelineDecl};
