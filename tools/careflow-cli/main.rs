use careflow::prelude::*;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Inspect, validate, and dry-run careflow workflow schemas from the
/// command line.
#[derive(Parser)]
#[command(name = "careflow-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the schema integrity pass (and optionally the publish checks).
    Validate {
        /// Path to a workflow schema JSON blob.
        schema: PathBuf,
        /// Also require publish-readiness (non-empty name).
        #[arg(long)]
        publish: bool,
    },
    /// Print the step listing of a schema.
    Inspect {
        schema: PathBuf,
    },
    /// Evaluate step visibility against a context file.
    Eval {
        schema: PathBuf,
        /// JSON file with `{"patient": {...}, "stepOutputs": {...}}`.
        #[arg(long)]
        context: PathBuf,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Validate { schema, publish } => {
            let schema = load_schema(&schema)?;
            if publish {
                schema.validate_for_publish()?;
            } else {
                schema.validate()?;
            }
            println!(
                "OK: '{}' ({} steps) passes {}",
                schema.name,
                schema.steps.len(),
                if publish {
                    "publish validation"
                } else {
                    "validation"
                }
            );
        }
        Command::Inspect { schema } => {
            let schema = load_schema(&schema)?;
            println!("Workflow '{}'", schema.name);
            println!("  syncPatient: {}", schema.sync_patient);
            for (index, step) in schema.steps.iter().enumerate() {
                println!(
                    "  [{}] {} ({:?}{}{})",
                    index,
                    step.id,
                    step.render_type,
                    step.form_id
                        .as_deref()
                        .map(|id| format!(", form {}", id))
                        .unwrap_or_default(),
                    if step.skippable { ", skippable" } else { "" },
                );
                for condition in &step.visibility.conditions {
                    let source = match &condition.step_id {
                        Some(step_id) => format!("${}.{}", step_id, condition.field),
                        None => format!("$patient.{}", condition.field),
                    };
                    println!(
                        "        when {} {} \"{}\"",
                        source, condition.operator, condition.value
                    );
                }
            }
        }
        Command::Eval { schema, context } => {
            let schema = load_schema(&schema)?;
            schema.validate()?;
            let ctx = load_context(&context)?;
            let evaluator = VisibilityEvaluator::new(&ctx);
            for step in &schema.steps {
                let trace = evaluator.explain(step)?;
                println!(
                    "{}: {} ({})",
                    trace.step_id,
                    if trace.visible { "visible" } else { "hidden" },
                    trace.reason()
                );
            }
        }
    }
    Ok(())
}

fn load_schema(path: &Path) -> Result<WorkflowSchema, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(WorkflowSchema::from_json_str(&text)?)
}

fn load_context(path: &Path) -> Result<EvaluationContext, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
