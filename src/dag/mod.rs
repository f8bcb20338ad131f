// src/dag/mod.rs

//! Workflow DAG model.
//!
//! - [`graph`] holds task declarations, validation and the validated
//!   arena used by the planner.
//! - [`builtin`] provides the resilience workflow the planner runs when no
//!   workflow file is given.

pub mod builtin;
pub mod graph;

pub use builtin::resilience_workflow;
pub use graph::{Dag, DagBuilder, DagTask, TaskDecl, ValidatedDag};
