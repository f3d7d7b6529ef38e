//! End-to-end pipeline tests: both phases, frozen constants, train/serve
//! equivalence.


use frieze_core::config::PipelineConfig;
use frieze_core::schema::{Arity, FieldSpec, Schema, ValueType};
use frieze_core::types::{Batch, Value};
use frieze_pipeline::Pipeline;
use frieze_transform::{OutputDef, OutputExpr, TransformFn};
use test_support::{f, rec, s};

fn numeric_schema(name: &str) -> Schema {
    Schema::build(vec![FieldSpec::new(name, ValueType::Float, Arity::Scalar)]).unwrap()
}

fn one_output(name: &str, expr: OutputExpr) -> TransformFn {
    TransformFn::new(vec![OutputDef {
        name: name.to_string(),
        expr,
    }])
}

#[test]
fn center_subtracts_the_batch_mean() {
    let schema = numeric_schema("x");
    let func = one_output(
        "x_centered",
        OutputExpr::Center {
            field: "x".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("x", f(1.0))]),
        rec(&[("x", f(2.0))]),
        rec(&[("x", f(3.0))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    let centered: Vec<&Value> = out.records.iter().map(|r| &r["x_centered"]).collect();
    assert_eq!(centered, vec![&f(-1.0), &f(0.0), &f(1.0)]);
}

#[test]
fn scale_0_1_normalizes_into_the_unit_interval() {
    let schema = numeric_schema("y");
    let func = one_output(
        "y_normalized",
        OutputExpr::Scale01 {
            field: "y".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("y", f(1.0))]),
        rec(&[("y", f(2.0))]),
        rec(&[("y", f(3.0))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    let scaled: Vec<&Value> = out.records.iter().map(|r| &r["y_normalized"]).collect();
    assert_eq!(scaled, vec![&f(0.0), &f(0.5), &f(1.0)]);
}

#[test]
fn scale_0_1_on_a_single_valued_field_is_zero_not_nan() {
    let schema = numeric_schema("y");
    let func = one_output(
        "y_normalized",
        OutputExpr::Scale01 {
            field: "y".to_string(),
        },
    );
    let batch: Batch = vec![rec(&[("y", f(7.0))]), rec(&[("y", f(7.0))])];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    for record in &out.records {
        assert_eq!(record["y_normalized"], f(0.0));
    }
}

#[test]
fn vocabulary_integerizes_by_descending_frequency() {
    let schema = Schema::build(vec![FieldSpec::new("s", ValueType::Str, Arity::Scalar)]).unwrap();
    let func = one_output(
        "s_integerized",
        OutputExpr::Integerize {
            field: "s".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("s", s("hello"))]),
        rec(&[("s", s("world"))]),
        rec(&[("s", s("hello"))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    let ids: Vec<&Value> = out.records.iter().map(|r| &r["s_integerized"]).collect();
    assert_eq!(ids, vec![&Value::I64(0), &Value::I64(1), &Value::I64(0)]);
}

#[test]
fn apply_single_matches_the_batch_output_for_every_record() {
    let schema = Schema::build(vec![
        FieldSpec::new("x", ValueType::Float, Arity::Scalar),
        FieldSpec::new("s", ValueType::Str, Arity::Scalar),
    ])
    .unwrap();
    let func = TransformFn::new(vec![
        OutputDef {
            name: "x_centered".to_string(),
            expr: OutputExpr::Center {
                field: "x".to_string(),
            },
        },
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
        rec(&[("x", f(10.0)), ("s", s("a"))]),
        rec(&[("x", f(20.0)), ("s", s("b"))]),
        rec(&[("x", f(30.0)), ("s", s("a"))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    for (input, expected) in batch.iter().zip(&out.records) {
        let served = pipe.apply_single(input).unwrap();
        assert_eq!(&served, expected);
    }
}

#[test]
fn transforming_is_idempotent_per_record() {
    let schema = numeric_schema("x");
    let func = one_output(
        "x_centered",
        OutputExpr::Center {
            field: "x".to_string(),
        },
    );
    let batch: Batch = vec![rec(&[("x", f(4.0))]), rec(&[("x", f(8.0))])];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    pipe.run(&batch).unwrap();

    let once = pipe.apply_single(&batch[0]).unwrap();
    let twice = pipe.apply_single(&batch[0]).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn sharded_analysis_matches_single_shard() {
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
    let batch: Batch = (0..100)
        .map(|i| rec(&[("x", f(i as f64)), ("s", s(["p", "q", "r"][i % 3]))]))
        .collect();

    let mut single = Pipeline::new(schema.clone(), func.clone(), PipelineConfig::default());
    let single_out = single.run(&batch).unwrap();

    let sharded_cfg = PipelineConfig {
        analyze_shards: 7,
        ..PipelineConfig::default()
    };
    let mut sharded = Pipeline::new(schema, func, sharded_cfg);
    let sharded_out = sharded.run(&batch).unwrap();

    assert_eq!(single_out.records, sharded_out.records);
    assert_eq!(
        single_out.artifact.constants,
        sharded_out.artifact.constants
    );
}

#[test]
fn strict_mode_aborts_with_every_validation_failure() {
    let schema = numeric_schema("x");
    let func = one_output(
        "x_centered",
        OutputExpr::Center {
            field: "x".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("x", f(1.0))]),
        rec(&[("x", s("oops"))]),
        rec(&[]), // missing required x
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    match pipe.run(&batch) {
        Err(frieze_pipeline::PipelineError::Validation(errors)) => {
            let indices: Vec<usize> = errors.iter().map(|(i, _)| *i).collect();
            assert_eq!(indices, vec![1, 2]);
        }
        other => panic!("expected aggregated validation failure, got {other:?}"),
    }
}

#[test]
fn lenient_mode_skips_and_reports_invalid_records() {
    let schema = numeric_schema("x");
    let func = one_output(
        "x_centered",
        OutputExpr::Center {
            field: "x".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("x", f(1.0))]),
        rec(&[("x", s("oops"))]),
        rec(&[("x", f(3.0))]),
    ];

    let cfg = PipelineConfig {
        lenient: true,
        ..PipelineConfig::default()
    };
    let mut pipe = Pipeline::new(schema, func, cfg);
    let out = pipe.run(&batch).unwrap();

    // mean over the two valid records is 2.0
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[0]["x_centered"], f(-1.0));
    assert_eq!(out.records[1]["x_centered"], f(1.0));
    assert_eq!(out.rejected.len(), 1);
    assert_eq!(out.rejected[0].0, 1);
}

#[test]
fn optional_fields_may_be_absent_and_are_absent_downstream() {
    let schema = Schema::build(vec![
        FieldSpec::new("x", ValueType::Float, Arity::Scalar),
        FieldSpec::new("note", ValueType::Str, Arity::Scalar).optional(),
    ])
    .unwrap();
    let func = TransformFn::new(vec![
        OutputDef {
            name: "x_centered".to_string(),
            expr: OutputExpr::Center {
                field: "x".to_string(),
            },
        },
        OutputDef {
            name: "note_raw".to_string(),
            expr: OutputExpr::Passthrough {
                field: "note".to_string(),
            },
        },
    ]);
    let batch: Batch = vec![
        rec(&[("x", f(1.0)), ("note", s("hi"))]),
        rec(&[("x", f(3.0))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    assert_eq!(out.records[0]["note_raw"], s("hi"));
    assert!(!out.records[1].contains_key("note_raw"));
}

#[test]
fn vector_fields_transform_elementwise() {
    let schema = Schema::build(vec![FieldSpec::new(
        "v",
        ValueType::Float,
        Arity::Vector(2),
    )])
    .unwrap();
    let func = one_output(
        "v_centered",
        OutputExpr::Center {
            field: "v".to_string(),
        },
    );
    let batch: Batch = vec![
        rec(&[("v", Value::F64List(vec![1.0, 2.0]))]),
        rec(&[("v", Value::F64List(vec![3.0, 4.0]))]),
    ];

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    let out = pipe.run(&batch).unwrap();

    // mean over every element is 2.5
    assert_eq!(
        out.records[0]["v_centered"],
        Value::F64List(vec![-1.5, -0.5])
    );
    assert_eq!(out.records[1]["v_centered"], Value::F64List(vec![0.5, 1.5]));
}

#[test]
fn empty_batch_fails_the_analyze_phase() {
    let schema = numeric_schema("x");
    let func = one_output(
        "x_centered",
        OutputExpr::Center {
            field: "x".to_string(),
        },
    );

    let mut pipe = Pipeline::new(schema, func, PipelineConfig::default());
    match pipe.run(&Batch::new()) {
        Err(frieze_pipeline::PipelineError::Analyzer(_)) => {}
        other => panic!("expected analyzer failure on empty batch, got {other:?}"),
    }
}
