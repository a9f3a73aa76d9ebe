//! `relay` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate` — validate a workflow definition JSON file.
//! - `run`      — execute a workflow definition with recording collaborators.
//! - `next-run` — compute the next fire time for a recurrence rule.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use actions::mock::{RecordingIntegrationSync, RecordingNotifier, RecordingTaskService};
use actions::ActionDispatcher;
use engine::{validate_workflow, WorkflowDefinition};
use schedule::{calculator, CronExpressionEvaluator, Recurrence};
use service::AutomationService;
use store::{MemoryTaskStore, MemoryWorkflowStore};

#[derive(Parser)]
#[command(
    name = "relay",
    about = "Workflow automation core: graph execution and recurring schedules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: std::path::PathBuf,
    },
    /// Execute a workflow definition file against an initial data bag.
    ///
    /// Collaborators are in-process recorders, so actions are performed
    /// without touching real services.
    Run {
        /// Path to the workflow JSON file.
        path: std::path::PathBuf,
        /// Initial data bag as inline JSON.
        #[arg(long, default_value = "{}")]
        input: String,
    },
    /// Compute the next fire time for a recurrence rule JSON file.
    NextRun {
        /// Path to the recurrence rule JSON file.
        path: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let workflow = load_workflow(&path);
            match validate_workflow(&workflow) {
                Ok(()) => {
                    println!(
                        "✅ Workflow '{}' is valid ({} steps)",
                        workflow.name,
                        workflow.steps.len()
                    );
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Run { path, input } => {
            let workflow = load_workflow(&path);
            let initial: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&input)
                    .unwrap_or_else(|e| panic!("--input is not a JSON object: {e}"));

            let dispatcher = Arc::new(ActionDispatcher::new(
                Arc::new(RecordingTaskService::new()),
                Arc::new(RecordingNotifier::new()),
                Arc::new(RecordingIntegrationSync::new()),
            ));
            let service = AutomationService::new(
                Arc::new(MemoryWorkflowStore::new()),
                Arc::new(MemoryTaskStore::new()),
                dispatcher,
                Arc::new(CronExpressionEvaluator),
            );

            let stored = match service.create_workflow(workflow).await {
                Ok(stored) => stored,
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            };

            info!(workflow = %stored.name, "executing workflow");
            match service.execute(stored.id, initial).await {
                Ok(record) => {
                    let rendered = serde_json::to_string_pretty(&record)
                        .unwrap_or_else(|e| panic!("cannot render execution record: {e}"));
                    println!("{rendered}");
                }
                Err(e) => {
                    eprintln!("❌ Execution refused: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::NextRun { path } => {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("cannot read file {}: {e}", path.display()));
            let rule: Recurrence = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("invalid recurrence rule: {e}"));

            match calculator::next_run(&rule, chrono::Utc::now(), &CronExpressionEvaluator) {
                Ok(next) => println!("⏰ Next run: {next}"),
                Err(e) => {
                    eprintln!("❌ Cannot compute next run: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_workflow(path: &std::path::Path) -> WorkflowDefinition {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read file {}: {e}", path.display()));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("invalid workflow JSON: {e}"))
}
