//! Workflow graph validation — run this before persisting or executing a
//! definition.
//!
//! Rules enforced, in order, first failure wins:
//! 1. Step IDs must be unique within the workflow.
//! 2. `triggerStep` must name an existing step of kind trigger.
//! 3. Every `nextSteps` entry must reference an existing step.
//! 4. The graph reachable from the trigger must be acyclic.
//!
//! Validation of an unchanged, already-valid definition always accepts.

use std::collections::{HashMap, HashSet};

use crate::models::{Step, WorkflowDefinition};
use crate::EngineError;

/// Validate the workflow's structure.
///
/// # Errors
/// - [`EngineError::DuplicateStepId`] if two steps share an ID.
/// - [`EngineError::MissingTrigger`] / [`EngineError::WrongTriggerKind`] for
///   a broken entry point.
/// - [`EngineError::DanglingReference`] if a successor doesn't exist.
/// - [`EngineError::CycleDetected`] naming the back-edge if the graph
///   reachable from the trigger is not acyclic.
pub fn validate_workflow(workflow: &WorkflowDefinition) -> Result<(), EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure step IDs are unique
    // -----------------------------------------------------------------------
    let mut seen_ids: HashSet<&str> = HashSet::new();
    for step in &workflow.steps {
        if !seen_ids.insert(step.id.as_str()) {
            return Err(EngineError::DuplicateStepId(step.id.clone()));
        }
    }

    let steps: HashMap<&str, &Step> =
        workflow.steps.iter().map(|s| (s.id.as_str(), s)).collect();

    // -----------------------------------------------------------------------
    // 2. The trigger must exist and be of the right kind
    // -----------------------------------------------------------------------
    let trigger = steps
        .get(workflow.trigger_step.as_str())
        .ok_or_else(|| EngineError::MissingTrigger(workflow.trigger_step.clone()))?;
    if !trigger.config.is_trigger() {
        return Err(EngineError::WrongTriggerKind(workflow.trigger_step.clone()));
    }

    // -----------------------------------------------------------------------
    // 3. Every successor reference must resolve
    // -----------------------------------------------------------------------
    for step in &workflow.steps {
        for target in &step.next_steps {
            if !steps.contains_key(target.as_str()) {
                return Err(EngineError::DanglingReference {
                    step_id: step.id.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // 4. Depth-first walk from the trigger; revisiting a step that is still
    //    on the stack is a back-edge. The walk is iterative with explicit
    //    enter/leave frames, so pathological graphs cannot overflow the call
    //    stack, and runs in O(steps + edges).
    // -----------------------------------------------------------------------
    enum Frame<'a> {
        Enter { id: &'a str, via: Option<&'a str> },
        Leave(&'a str),
    }

    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut frames = vec![Frame::Enter { id: workflow.trigger_step.as_str(), via: None }];

    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Enter { id, via } => {
                if on_stack.contains(id) {
                    return Err(EngineError::CycleDetected {
                        from: via.unwrap_or(id).to_owned(),
                        to: id.to_owned(),
                    });
                }
                if !visited.insert(id) {
                    // Already fully explored via another path (fan-in).
                    continue;
                }
                on_stack.insert(id);
                frames.push(Frame::Leave(id));
                for target in steps[id].next_steps.iter().rev() {
                    frames.push(Frame::Enter { id: target.as_str(), via: Some(id) });
                }
            }
            Frame::Leave(id) => {
                on_stack.remove(id);
            }
        }
    }

    Ok(())
}
