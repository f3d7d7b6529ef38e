//! The two-phase orchestrator: Init → Analyzing → Transforming → Frozen.
//!
//! One instance handles one batch. Every record is validated before the
//! analyze phase starts; the analyze fold runs sharded and merges behind a
//! join barrier; the transform phase maps records against the frozen
//! constants in input order. Any fatal error parks the instance in a
//! terminal `Failed` state, so a caller can never observe a partially
//! frozen artifact.

use frieze_analyzers::{Accumulator, AnalyzerError, AnalyzerSpec, ConstantsTable};
use frieze_core::config::PipelineConfig;
use frieze_core::error::ValidationError;
use frieze_core::schema::Schema;
use frieze_core::types::{Batch, Record};
use frieze_transform::{derive_output_schema, TransformFn};

use crate::artifact::FrozenArtifact;
use crate::error::{PipelineError, StateError};
use crate::metrics;
use crate::serve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Init,
    Analyzing,
    Transforming,
    Frozen,
    Failed,
}

/// Everything a successful run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// Transformed records, in input order (of the records that passed
    /// validation). Index alignment is the traceability contract.
    pub records: Vec<Record>,

    /// Records excluded by lenient validation, with their original batch
    /// indices. Empty in strict mode (strict aborts instead).
    pub rejected: Vec<(usize, ValidationError)>,

    pub artifact: FrozenArtifact,
}

pub struct Pipeline {
    schema: Schema,
    func: TransformFn,
    cfg: PipelineConfig,
    state: PipelineState,
    artifact: Option<FrozenArtifact>,
}

impl Pipeline {
    pub fn new(schema: Schema, func: TransformFn, cfg: PipelineConfig) -> Self {
        Self {
            schema,
            func,
            cfg,
            state: PipelineState::Init,
            artifact: None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.state == PipelineState::Frozen
    }

    /// The frozen artifact, once `run` has succeeded.
    pub fn artifact(&self) -> Option<&FrozenArtifact> {
        self.artifact.as_ref()
    }

    /// Execute both phases over `batch` and freeze.
    pub fn run(&mut self, batch: &Batch) -> Result<RunOutput, PipelineError> {
        match self.state {
            PipelineState::Init => {}
            PipelineState::Frozen => return Err(StateError::AlreadyFrozen.into()),
            _ => return Err(StateError::Failed.into()),
        }

        // A misdeclared transform must fail before any record is touched.
        let output_schema = match derive_output_schema(&self.schema, &self.func) {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e)),
        };

        // Validate the whole batch up front; the analyze phase must only
        // ever see records the schema accepts.
        let mut rejected: Vec<(usize, ValidationError)> = Vec::new();
        let mut kept: Vec<(usize, &Record)> = Vec::new();
        for (idx, record) in batch.iter().enumerate() {
            match self.schema.validate(record) {
                Ok(()) => kept.push((idx, record)),
                Err(e) => rejected.push((idx, e)),
            }
        }
        if !rejected.is_empty() && !self.cfg.lenient {
            self.state = PipelineState::Failed;
            return Err(PipelineError::Validation(rejected));
        }

        self.state = PipelineState::Analyzing;
        metrics::phase_event("analyzing", &[("records", kept.len().to_string())]);
        let specs = self.func.analyzer_specs();
        let records: Vec<&Record> = kept.iter().map(|(_, r)| *r).collect();
        let constants = match analyze(&records, &specs, self.cfg.analyze_shards.max(1)) {
            Ok(table) => table,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = PipelineState::Transforming;
        metrics::phase_event("transforming", &[("constants", constants.len().to_string())]);
        let mut out = Vec::with_capacity(kept.len());
        for (idx, record) in &kept {
            let produced = match self.func.apply(record, &constants) {
                Ok(r) => r,
                Err(e) => return Err(self.fail(e)),
            };
            // Shape drift across records would make the artifact's output
            // schema ambiguous.
            if let Err(error) = output_schema.validate(&produced) {
                self.state = PipelineState::Failed;
                return Err(PipelineError::Metadata {
                    record: *idx,
                    error,
                });
            }
            out.push(produced);
        }

        let artifact = match FrozenArtifact::new(
            self.schema.clone(),
            output_schema,
            constants,
            self.func.clone(),
        ) {
            Ok(a) => a,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = PipelineState::Frozen;
        metrics::phase_event("frozen", &[("artifact", artifact.id.0.to_string())]);
        self.artifact = Some(artifact.clone());

        Ok(RunOutput {
            records: out,
            rejected,
            artifact,
        })
    }

    /// Serving-time entry point: Phase-2 logic on one record, using the
    /// stored constants. Never re-enters the analyze phase.
    pub fn apply_single(&self, record: &Record) -> Result<Record, PipelineError> {
        let artifact = match (self.state, &self.artifact) {
            (PipelineState::Frozen, Some(a)) => a,
            (PipelineState::Failed, _) => return Err(StateError::Failed.into()),
            _ => return Err(StateError::NotFrozen.into()),
        };
        Ok(serve::transform_one(artifact, record)?)
    }

    fn fail(&mut self, e: impl Into<PipelineError>) -> PipelineError {
        self.state = PipelineState::Failed;
        e.into()
    }
}

/// Phase 1: fold every kept record into per-shard accumulators, merge the
/// partials in shard order, finalize into the constants table.
///
/// The merge happens after every shard has joined; no partial state leaks
/// out, and an error in any shard discards all partials.
fn analyze(
    records: &[&Record],
    specs: &[AnalyzerSpec],
    shards: usize,
) -> Result<ConstantsTable, AnalyzerError> {
    let mut table = ConstantsTable::new();
    if specs.is_empty() {
        return Ok(table);
    }

    let partials: Vec<Result<Vec<Accumulator>, AnalyzerError>> =
        if shards <= 1 || records.len() < 2 {
            vec![fold_shard(records, specs)]
        } else {
            let chunk = records.len().div_ceil(shards);
            std::thread::scope(|scope| {
                let handles: Vec<_> = records
                    .chunks(chunk)
                    .map(|slice| scope.spawn(move || fold_shard(slice, specs)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| match h.join() {
                        Ok(result) => result,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            })
        };

    // Merge barrier: all shards have joined by now.
    let mut merged: Option<Vec<Accumulator>> = None;
    for partial in partials {
        let partial = partial?;
        match &mut merged {
            None => merged = Some(partial),
            Some(accs) => {
                for (acc, other) in accs.iter_mut().zip(partial) {
                    acc.merge(other)?;
                }
            }
        }
    }

    let merged = merged.unwrap_or_else(|| specs.iter().map(|s| Accumulator::seed(s.kind)).collect());
    for (acc, spec) in merged.into_iter().zip(specs) {
        table.insert(spec, acc.finalize(spec)?);
    }
    Ok(table)
}

fn fold_shard(
    records: &[&Record],
    specs: &[AnalyzerSpec],
) -> Result<Vec<Accumulator>, AnalyzerError> {
    let mut accs: Vec<Accumulator> = specs.iter().map(|s| Accumulator::seed(s.kind)).collect();
    for record in records {
        for (acc, spec) in accs.iter_mut().zip(specs) {
            if let Some(value) = record.get(&spec.field) {
                acc.accumulate(&spec.field, value)?;
            }
        }
    }
    Ok(accs)
}
