//! frieze CLI: run, validate, and explain preprocessing pipelines, and
//! apply frozen artifacts at serving time.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use frieze_core::config::PipelineConfig;
use frieze_core::types::{Batch, Record};
use frieze_pipeline::{Pipeline, ServingContext};
use frieze_transform::derive_output_schema;
use frieze_transform::dsl::parse_yaml_pipeline;

#[derive(Parser)]
#[command(name = "frieze")]
#[command(about = "frieze: two-phase feature preprocessing with train/serve consistency", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze + transform a batch and freeze the artifact
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Path to the input records (JSON lines, one record per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write transformed records (JSON lines; stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Where to persist the frozen artifact (JSON)
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Skip invalid records instead of aborting (they are still reported)
        #[arg(long)]
        lenient: bool,

        /// Shard count for the analyze-phase fold (overrides config)
        #[arg(long)]
        shards: Option<usize>,
    },

    /// Check a pipeline YAML file (syntax + schema/transform consistency)
    Validate {
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the analyzers a pipeline runs and its derived output schema
    Explain {
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Serving-time transform: apply a frozen artifact to records
    Apply {
        /// Path to a frozen artifact JSON file
        #[arg(short, long)]
        artifact: PathBuf,

        /// Path to the input records (JSON lines)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write transformed records (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands) -> Result<(), String> {
    match command {
        Commands::Run {
            pipeline,
            input,
            output,
            artifact,
            lenient,
            shards,
        } => {
            let (schema, func) = load_pipeline(&pipeline)?;
            let batch = read_records(&input)?;

            let mut cfg = PipelineConfig::from_env();
            cfg.lenient = cfg.lenient || lenient;
            if let Some(n) = shards {
                cfg.analyze_shards = n.max(1);
            }

            let mut pipe = Pipeline::new(schema, func, cfg);
            let out = pipe.run(&batch).map_err(|e| e.to_string())?;

            for (idx, err) in &out.rejected {
                eprintln!("skipped record {idx}: {err}");
            }
            write_records(&out.records, output.as_deref())?;

            if let Some(path) = artifact {
                let text = out.artifact.to_json().map_err(|e| e.to_string())?;
                fs::write(&path, text)
                    .map_err(|e| format!("writing {}: {e}", path.display()))?;
                eprintln!(
                    "frozen artifact {} written to {}",
                    out.artifact.id.0,
                    path.display()
                );
            }
            Ok(())
        }

        Commands::Validate { pipeline } => {
            let (schema, func) = load_pipeline(&pipeline)?;
            derive_output_schema(&schema, &func).map_err(|e| e.to_string())?;
            println!("{}: ok", pipeline.display());
            Ok(())
        }

        Commands::Explain { pipeline } => {
            let (schema, func) = load_pipeline(&pipeline)?;
            let out_schema = derive_output_schema(&schema, &func).map_err(|e| e.to_string())?;

            println!("analyzers:");
            for spec in func.analyzer_specs() {
                println!("  {}", spec.key());
            }
            println!("output schema:");
            for f in out_schema.fields() {
                println!(
                    "  {} {:?} {:?}{}",
                    f.name,
                    f.value_type,
                    f.arity,
                    if f.required { "" } else { " (optional)" }
                );
            }
            Ok(())
        }

        Commands::Apply {
            artifact,
            input,
            output,
        } => {
            let text = fs::read_to_string(&artifact)
                .map_err(|e| format!("reading {}: {e}", artifact.display()))?;
            let ctx = ServingContext::from_json(&text).map_err(|e| e.to_string())?;

            let records = read_records(&input)?;
            let mut transformed = Vec::with_capacity(records.len());
            for (idx, record) in records.iter().enumerate() {
                let out = ctx
                    .apply_single(record)
                    .map_err(|e| format!("record {idx}: {e}"))?;
                transformed.push(out);
            }
            write_records(&transformed, output.as_deref())
        }
    }
}

fn load_pipeline(
    path: &PathBuf,
) -> Result<(frieze_core::schema::Schema, frieze_transform::TransformFn), String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    parse_yaml_pipeline(&text).map_err(|e| e.to_string())
}

fn read_records(path: &PathBuf) -> Result<Batch, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let mut batch = Batch::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: {e}", path.display(), lineno + 1))?;
        batch.push(record);
    }
    Ok(batch)
}

fn write_records(records: &[Record], path: Option<&std::path::Path>) -> Result<(), String> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| e.to_string())?;
        out.push_str(&line);
        out.push('\n');
    }
    match path {
        Some(p) => fs::write(p, out).map_err(|e| format!("writing {}: {e}", p.display())),
        None => {
            print!("{out}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frieze_core::types::Value;

    #[test]
    fn record_lines_parse_into_typed_values() {
        let record: Record =
            serde_json::from_str(r#"{"x": 1.5, "s": "hello", "tags": ["a", "b"]}"#).unwrap();
        assert_eq!(record["x"], Value::F64(1.5));
        assert_eq!(record["s"], Value::Str("hello".into()));
        assert_eq!(
            record["tags"],
            Value::StrList(vec!["a".into(), "b".into()])
        );
    }
}
