// src/heft/mod.rs

//! HEFT list scheduling.
//!
//! - [`rank`] computes upward ranks.
//! - [`scheduler`] contains the planning run and its phase machine.
//! - [`state`] defines per-task and per-run states.
//! - [`step`] defines the per-decision record.

pub mod rank;
pub mod scheduler;
pub mod state;
pub mod step;

pub use rank::upward_ranks;
pub use scheduler::HeftScheduler;
pub use state::{SchedulerPhase, TaskState};
pub use step::AssignmentStep;

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::errors::Result;
use crate::fleet::Fleet;
use crate::schedule::Schedule;

/// Validate, rank and schedule `dag` in one call.
pub fn plan(fleet: &Fleet, costs: &CostModel, dag: &Dag) -> Result<Schedule> {
    HeftScheduler::new(fleet, costs, dag)?.run()
}
