//! Workflow execution.
//!
//! `WorkflowExecutor` walks a validated definition from its trigger step:
//! 1. Trigger steps pass straight through to their successors.
//! 2. Condition steps pick exactly one successor — index 0 on true, index 1
//!    on false; a missing entry for the resolved branch ends that path.
//! 3. Action steps dispatch through `ActionDispatcher`, merge their output
//!    into the run's data bag (last writer wins), and fan out to all
//!    successors.
//!
//! A dispatch failure marks the run failed and stops the walk; the record is
//! always returned, never an error. Side effects already performed are not
//! rolled back.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument};

use actions::ActionDispatcher;

use crate::condition;
use crate::models::{ExecutionRecord, Step, StepConfig, WorkflowDefinition};

/// Stateless orchestrator for workflow runs.
///
/// One executor can serve arbitrarily many concurrent `execute` calls; each
/// call owns its own [`ExecutionRecord`] and shares no mutable state with
/// any other run.
pub struct WorkflowExecutor {
    dispatcher: Arc<ActionDispatcher>,
}

impl WorkflowExecutor {
    pub fn new(dispatcher: Arc<ActionDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Run the workflow against `initial_data` and return the finished record.
    ///
    /// The definition must have passed [`crate::validate_workflow`]; the walk
    /// trusts step references. There is no cancellation: once started, the
    /// run proceeds to a terminal status.
    #[instrument(skip_all, fields(workflow_id = %workflow.id))]
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        initial_data: Map<String, Value>,
    ) -> ExecutionRecord {
        let mut record = ExecutionRecord::begin(workflow.id, initial_data);

        let steps: HashMap<&str, &Step> =
            workflow.steps.iter().map(|s| (s.id.as_str(), s)).collect();

        // Depth-first work list. Successors are pushed in reverse so the walk
        // visits them in declaration order, keeping last-writer-wins merges
        // deterministic.
        let mut pending: Vec<&str> = vec![workflow.trigger_step.as_str()];

        while let Some(step_id) = pending.pop() {
            let Some(step) = steps.get(step_id).copied() else {
                // Only reachable for definitions that skipped validation.
                record.fail(format!("step '{step_id}' not found in workflow"));
                break;
            };
            record.current_step = Some(step.id.clone());

            match &step.config {
                StepConfig::Trigger => {
                    for target in step.next_steps.iter().rev() {
                        pending.push(target);
                    }
                }
                StepConfig::Condition(cfg) => {
                    let outcome = condition::evaluate(cfg, &record.data);
                    debug!(step = %step.id, outcome, "condition evaluated");
                    let branch = usize::from(!outcome);
                    if let Some(target) = step.next_steps.get(branch) {
                        pending.push(target);
                    }
                }
                StepConfig::Action(action) => {
                    match self.dispatcher.dispatch(action, &record.data).await {
                        Ok(output) => {
                            for (key, value) in output {
                                record.data.insert(key, value);
                            }
                            for target in step.next_steps.iter().rev() {
                                pending.push(target);
                            }
                        }
                        Err(err) => {
                            error!(step = %step.id, "action failed: {err}");
                            record.fail(err.to_string());
                            break;
                        }
                    }
                }
            }
        }

        record.finish();
        info!(
            execution_id = %record.id,
            status = %record.status,
            "workflow run finished"
        );
        record
    }
}
