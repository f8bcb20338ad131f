// src/schedule/mod.rs

//! Finished plan and the queries run against it.
//!
//! A [`Schedule`] only grows while a [`crate::heft::HeftScheduler`] owns
//! it; once handed out it is read-only. Queries:
//!
//! - [`Schedule::makespan`] / [`Schedule::timeline`] for reporting;
//! - [`Schedule::exclusion_for`] / [`Schedule::exclusion_summary`] for fault
//!   injectors that must stay clear of nodes running planned work;
//! - [`Schedule::failure_targets`] for the complementary set of nodes and
//!   zones that may be failed;
//! - [`Schedule::node_utilization`] for per-node busy time.

pub mod report;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::cost::WORKER_CLASS;
use crate::errors::{HeftError, Result};
use crate::fleet::Fleet;
use crate::types::{NodeId, TaskId, TaskType, ZoneId};

/// Placement of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub task: TaskId,
    pub task_type: TaskType,
    pub node: NodeId,
    pub zone: ZoneId,
    pub start: f64,
    pub end: f64,
    pub rank: f64,
}

impl Assignment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Node and zone a single task runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskExclusion {
    pub exclude_node: NodeId,
    pub exclude_zone: ZoneId,
}

/// Every node and zone used anywhere in a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionSummary {
    pub exclude_nodes: BTreeSet<NodeId>,
    pub exclude_zones: BTreeSet<ZoneId>,
}

/// Fleet members a fault injector may still target, in fleet order.
///
/// `eligible_nodes` holds worker nodes only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureTargets {
    pub eligible_nodes: Vec<NodeId>,
    pub eligible_zones: Vec<ZoneId>,
}

/// Busy time of one node relative to the makespan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUtilization {
    pub node: NodeId,
    pub zone: ZoneId,
    pub busy: f64,
    pub tasks: usize,
    /// `busy / makespan`, or 0 for an empty schedule.
    pub utilization: f64,
}

/// Task → (node, start, end) mapping produced by one planning run.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    /// In the order the scheduler decided them.
    assignments: Vec<Assignment>,
    by_task: HashMap<TaskId, usize>,
}

impl Schedule {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a decision. A task can be placed only once.
    pub(crate) fn record(&mut self, assignment: Assignment) -> Result<()> {
        if self.by_task.contains_key(&assignment.task) {
            return Err(HeftError::config(format!(
                "task '{}' was assigned twice",
                assignment.task
            )));
        }
        self.by_task
            .insert(assignment.task.clone(), self.assignments.len());
        self.assignments.push(assignment);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assignments in decision (priority) order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn get(&self, task: &str) -> Option<&Assignment> {
        self.by_task.get(task).map(|&idx| &self.assignments[idx])
    }

    /// Latest end time over all tasks (0 for an empty schedule).
    pub fn makespan(&self) -> f64 {
        self.assignments
            .iter()
            .map(|a| a.end)
            .fold(0.0, f64::max)
    }

    /// Assignments sorted by start time, then task id.
    pub fn timeline(&self) -> Vec<&Assignment> {
        let mut out: Vec<&Assignment> = self.assignments.iter().collect();
        out.sort_by(|a, b| a.start.total_cmp(&b.start).then_with(|| a.task.cmp(&b.task)));
        out
    }

    pub fn exclusion_for(&self, task: &str) -> Option<TaskExclusion> {
        self.get(task).map(|a| TaskExclusion {
            exclude_node: a.node.clone(),
            exclude_zone: a.zone.clone(),
        })
    }

    pub fn exclusion_summary(&self) -> ExclusionSummary {
        let mut summary = ExclusionSummary::default();
        for a in self.assignments.iter() {
            summary.exclude_nodes.insert(a.node.clone());
            summary.exclude_zones.insert(a.zone.clone());
        }
        summary
    }

    /// Worker nodes and fleet zones outside the exclusion summary.
    ///
    /// Only `worker`-class nodes are ever offered; masters run the control
    /// plane and are never failure targets.
    ///
    /// Fails if the schedule references a node the fleet does not know,
    /// which means the schedule was built against a different fleet.
    pub fn failure_targets(&self, fleet: &Fleet) -> Result<FailureTargets> {
        self.ensure_nodes_in(fleet)?;
        let summary = self.exclusion_summary();

        let eligible_nodes = fleet
            .nodes()
            .iter()
            .filter(|n| n.class == WORKER_CLASS)
            .filter(|n| !summary.exclude_nodes.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();

        let mut eligible_zones: Vec<ZoneId> = Vec::new();
        for node in fleet.nodes() {
            if !summary.exclude_zones.contains(&node.zone) && !eligible_zones.contains(&node.zone) {
                eligible_zones.push(node.zone.clone());
            }
        }

        Ok(FailureTargets {
            eligible_nodes,
            eligible_zones,
        })
    }

    /// Per-node busy time, in fleet order.
    pub fn node_utilization(&self, fleet: &Fleet) -> Result<Vec<NodeUtilization>> {
        self.ensure_nodes_in(fleet)?;
        let makespan = self.makespan();

        Ok(fleet
            .nodes()
            .iter()
            .map(|node| {
                let (busy, tasks) = self
                    .assignments
                    .iter()
                    .filter(|a| a.node == node.id)
                    .fold((0.0, 0), |(busy, n), a| (busy + a.duration(), n + 1));
                NodeUtilization {
                    node: node.id.clone(),
                    zone: node.zone.clone(),
                    busy,
                    tasks,
                    utilization: if makespan > 0.0 { busy / makespan } else { 0.0 },
                }
            })
            .collect())
    }

    fn ensure_nodes_in(&self, fleet: &Fleet) -> Result<()> {
        for a in self.assignments.iter() {
            fleet.node(&a.node)?;
        }
        Ok(())
    }
}
