// src/heft/state.rs

//! Per-task and per-run planning states.

/// Planning state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Declared, upward rank not computed yet.
    Unranked,
    /// Upward rank known, waiting for its turn in the priority list.
    Ranked,
    /// Assigned to a node with a start and end time (terminal).
    Scheduled,
}

/// Phase of a whole planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// DAG validated, nothing computed.
    Initialized,
    /// Every task has an upward rank.
    AllRanked,
    /// Every task is placed; the schedule is final (terminal).
    AllScheduled,
}
