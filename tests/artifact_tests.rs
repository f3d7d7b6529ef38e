//! Frozen-artifact persistence and serving from the reloaded form.


use frieze_core::config::PipelineConfig;
use frieze_core::schema::{Arity, FieldSpec, Schema, ValueType};
use frieze_core::types::{Batch, Value};
use frieze_pipeline::{FrozenArtifact, Pipeline, ServeError, ServingContext};
use frieze_transform::{OutputDef, OutputExpr, TransformFn};
use test_support::{f, rec, s};

fn frozen() -> (Pipeline, Batch) {
    let schema = Schema::build(vec![
        FieldSpec::new("x", ValueType::Float, Arity::Scalar),
        FieldSpec::new("s", ValueType::Str, Arity::Scalar),
    ])
    .unwrap();
    let func = TransformFn::new(vec![
        OutputDef {
            name: "x_scaled".to_string(),
            expr: OutputExpr::Scale01 {
                field: "x".to_string(),
            },
        },
        OutputDef {
            name: "s_id".to_string(),
            expr: OutputExpr::Integerize {
                field: "s".to_string(),
            },
        },
    ]);
    let batch: Batch = vec![
        rec(&[("x", f(0.0)), ("s", s("red"))]),
        rec(&[("x", f(5.0)), ("s", s("green"))]),
        rec(&[("x", f(10.0)), ("s", s("red"))]),
    ];
    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    pipe.run(&batch).unwrap();
    (pipe, batch)
}

#[test]
fn artifact_round_trips_through_json() {
    let (pipe, _) = frozen();
    let artifact = pipe.artifact().unwrap();

    let text = artifact.to_json().unwrap();
    let reloaded = FrozenArtifact::from_json(&text).unwrap();

    assert_eq!(&reloaded, artifact);
    assert_eq!(reloaded.digest().unwrap(), artifact.digest().unwrap());
}

#[test]
fn the_persisted_document_carries_every_serving_ingredient() {
    let (pipe, _) = frozen();
    let text = pipe.artifact().unwrap().to_json().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    // A separate serving process reconstructs apply_single from these alone.
    for key in [
        "id",
        "engine_version",
        "input_schema",
        "output_schema",
        "constants",
        "transform",
        "transform_hash",
        "created_ms",
    ] {
        assert!(doc.get(key).is_some(), "artifact JSON is missing '{key}'");
    }

    // Constants serialize as a plain object keyed by analyzer spec, with
    // the full vocabulary list inline.
    let entries = &doc["constants"]["entries"];
    assert!(entries.get("scale_0_1(x)").is_some());
    let vocab = &entries["vocabulary(s)"]["Vocabulary"];
    assert_eq!(vocab[0], "red");
    assert_eq!(vocab[1], "green");
}

#[test]
fn serving_from_a_reloaded_artifact_matches_training_output() {
    let (pipe, batch) = frozen();
    let text = pipe.artifact().unwrap().to_json().unwrap();
    let ctx = ServingContext::from_json(&text).unwrap();

    for record in &batch {
        assert_eq!(
            ctx.apply_single(record).unwrap(),
            pipe.apply_single(record).unwrap()
        );
    }
}

#[test]
fn unseen_vocabulary_strings_serve_as_the_oov_index() {
    let (pipe, _) = frozen();
    let ctx = ServingContext::new(pipe.artifact().unwrap().clone());

    let novel = rec(&[("x", f(5.0)), ("s", s("ultraviolet"))]);
    let out = ctx.apply_single(&novel).unwrap();
    assert_eq!(out["s_id"], Value::I64(frieze_analyzers::OOV_INDEX));
}

#[test]
fn serving_still_validates_against_the_input_schema() {
    let (pipe, _) = frozen();
    let ctx = ServingContext::new(pipe.artifact().unwrap().clone());

    let bad = rec(&[("x", s("not a float")), ("s", s("red"))]);
    match ctx.apply_single(&bad) {
        Err(ServeError::Validation(_)) => {}
        other => panic!("expected validation rejection, got {other:?}"),
    }
}

#[test]
fn serving_output_validates_against_the_stored_output_schema() {
    let (pipe, batch) = frozen();
    let ctx = ServingContext::new(pipe.artifact().unwrap().clone());

    let out = ctx.apply_single(&batch[0]).unwrap();
    ctx.artifact().output_schema.validate(&out).unwrap();
}

#[test]
fn transform_hash_is_stable_across_identical_declarations() {
    let (pipe_a, _) = frozen();
    let (pipe_b, _) = frozen();
    assert_eq!(
        pipe_a.artifact().unwrap().transform_hash,
        pipe_b.artifact().unwrap().transform_hash
    );
}
