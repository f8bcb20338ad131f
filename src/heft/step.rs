// src/heft/step.rs

//! Record of a single assignment decision.

use crate::types::{NodeId, TaskId};

/// One greedy decision: `task` went to `node` for `[start, finish)`.
///
/// `availability_before`/`availability_after` are the chosen node's
/// availability around the decision; after ≥ before always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStep {
    pub task: TaskId,
    pub node: NodeId,
    pub start: f64,
    pub finish: f64,
    pub availability_before: f64,
    pub availability_after: f64,
}
