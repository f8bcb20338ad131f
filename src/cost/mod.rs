// src/cost/mod.rs

//! Execution and communication cost model.
//!
//! - [`CostModel`] holds the execution-cost table (task type × node class)
//!   and the communication-cost table (zone × zone), plus the documented
//!   fallbacks used when an entry is missing.
//! - [`feed`] reads the optional historical-cost feed.
//! - [`normalize`] maps benchmark step names onto task types.

pub mod feed;
pub mod normalize;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::{HeftError, Result};
use crate::fleet::{Fleet, Node};
use crate::types::{TaskType, ZoneId};

pub use feed::{CostFeed, CostFeedWarning, StepObservation};

/// Node class whose cost a feed mean replaces.
pub const WORKER_CLASS: &str = "worker";
/// Node class whose cost is derived from the worker mean.
pub const MASTER_CLASS: &str = "master";

/// Default `master` cost = feed mean × this, when the feed has no master data.
pub const DEFAULT_MASTER_MULTIPLIER: f64 = 1.2;
/// Cost of an ordered zone pair missing from the communication table.
pub const DEFAULT_CROSS_ZONE_COST: f64 = 1.0;
pub const DEFAULT_UNKNOWN_MASTER_COST: f64 = 100.0;
pub const DEFAULT_UNKNOWN_WORKER_COST: f64 = 80.0;

/// Cost per node class for one task type.
pub type ClassCosts = BTreeMap<String, f64>;

/// Fallbacks for incomplete tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CostDefaults {
    /// Costs for a task type absent from the execution table.
    pub unknown_task: ClassCosts,
    pub cross_zone_cost: f64,
    pub master_multiplier: f64,
}

impl Default for CostDefaults {
    fn default() -> Self {
        Self {
            unknown_task: ClassCosts::from([
                (MASTER_CLASS.to_string(), DEFAULT_UNKNOWN_MASTER_COST),
                (WORKER_CLASS.to_string(), DEFAULT_UNKNOWN_WORKER_COST),
            ]),
            cross_zone_cost: DEFAULT_CROSS_ZONE_COST,
            master_multiplier: DEFAULT_MASTER_MULTIPLIER,
        }
    }
}

/// One cost-feed override that was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOverride {
    pub task_type: TaskType,
    pub platform: String,
    pub step: String,
    pub worker: f64,
    pub master: f64,
}

/// Outcome of [`CostModel::apply_overrides`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideReport {
    pub applied: Vec<AppliedOverride>,
    pub warnings: Vec<CostFeedWarning>,
}

/// Read-only cost tables.
#[derive(Debug, Clone)]
pub struct CostModel {
    exec: BTreeMap<TaskType, ClassCosts>,
    comm: BTreeMap<ZoneId, BTreeMap<ZoneId, f64>>,
    defaults: CostDefaults,
}

impl CostModel {
    /// Build a cost model, checking that every cost is a usable number.
    ///
    /// Coverage of a particular fleet is checked separately by
    /// [`CostModel::validate_for`].
    pub fn new(
        exec: BTreeMap<TaskType, ClassCosts>,
        comm: impl IntoIterator<Item = (ZoneId, ZoneId, f64)>,
        defaults: CostDefaults,
    ) -> Result<Self> {
        for (task_type, row) in exec.iter() {
            if row.is_empty() {
                return Err(HeftError::config(format!(
                    "execution cost for '{task_type}' has no node classes"
                )));
            }
            for (class, cost) in row.iter() {
                ensure_positive(*cost, || format!("execution cost {task_type}/{class}"))?;
            }
        }
        for (class, cost) in defaults.unknown_task.iter() {
            ensure_positive(*cost, || format!("default execution cost for class '{class}'"))?;
        }
        ensure_non_negative(defaults.cross_zone_cost, || "default cross-zone cost".to_string())?;
        ensure_positive(defaults.master_multiplier, || "master multiplier".to_string())?;

        let mut table: BTreeMap<ZoneId, BTreeMap<ZoneId, f64>> = BTreeMap::new();
        for (from, to, cost) in comm {
            ensure_non_negative(cost, || format!("communication cost {from}->{to}"))?;
            let previous = table.entry(from.clone()).or_default().insert(to.clone(), cost);
            if previous.is_some() {
                return Err(HeftError::config(format!(
                    "communication cost {from}->{to} is declared more than once"
                )));
            }
        }

        Ok(Self {
            exec,
            comm: table,
            defaults,
        })
    }

    /// Check that this model can price every node of `fleet`: each node
    /// class has a cost in every execution row and in the unknown-task
    /// default, and each zone has a same-zone communication entry.
    pub fn validate_for(&self, fleet: &Fleet) -> Result<()> {
        for class in fleet.classes() {
            for (task_type, row) in self.exec.iter() {
                if !row.contains_key(class) {
                    return Err(HeftError::config(format!(
                        "execution cost for '{task_type}' has no entry for node class '{class}'"
                    )));
                }
            }
            if !self.defaults.unknown_task.contains_key(class) {
                return Err(HeftError::config(format!(
                    "default execution cost has no entry for node class '{class}'"
                )));
            }
        }

        for zone in fleet.zones() {
            if self.zone_pair_cost(zone, zone).is_none() {
                return Err(HeftError::config(format!(
                    "communication cost table has no same-zone entry for zone '{zone}'"
                )));
            }
        }

        Ok(())
    }

    pub fn defaults(&self) -> &CostDefaults {
        &self.defaults
    }

    /// Task types that have an explicit execution-cost row.
    pub fn task_types(&self) -> impl Iterator<Item = &str> {
        self.exec.keys().map(|s| s.as_str())
    }

    pub fn has_task_type(&self, task_type: &str) -> bool {
        self.exec.contains_key(task_type)
    }

    /// Base cost row for a task type, or the unknown-task default.
    pub fn class_costs(&self, task_type: &str) -> &ClassCosts {
        match self.exec.get(task_type) {
            Some(row) => row,
            None => {
                debug!(task_type, "no execution cost for task type; using default pair");
                &self.defaults.unknown_task
            }
        }
    }

    /// `base[task_type][node.class] / node.capacity`.
    ///
    /// A class not covered by the table yields `f64::INFINITY`; fleets are
    /// checked with [`CostModel::validate_for`] before scheduling, so the
    /// scheduler never sees that value.
    pub fn execution_cost(&self, task_type: &str, node: &Node) -> f64 {
        self.class_costs(task_type)
            .get(&node.class)
            .map(|base| base / node.capacity)
            .unwrap_or(f64::INFINITY)
    }

    /// `comm[(src.zone, dst.zone)] * data_size`, falling back to the default
    /// cross-zone cost for an absent pair.
    pub fn communication_cost(&self, src: &Node, dst: &Node, data_size: f64) -> f64 {
        self.zone_pair_cost(&src.zone, &dst.zone)
            .unwrap_or(self.defaults.cross_zone_cost)
            * data_size
    }

    /// Execution cost averaged uniformly over all nodes of the fleet.
    pub fn average_execution_cost(&self, task_type: &str, fleet: &Fleet) -> f64 {
        let total: f64 = fleet
            .nodes()
            .iter()
            .map(|n| self.execution_cost(task_type, n))
            .sum();
        total / fleet.len() as f64
    }

    /// Unit communication cost averaged over all ordered node pairs
    /// (self-pairs included).
    pub fn average_communication_cost(&self, fleet: &Fleet) -> f64 {
        let nodes = fleet.nodes();
        let total: f64 = nodes
            .iter()
            .flat_map(|src| nodes.iter().map(move |dst| (src, dst)))
            .map(|(src, dst)| self.communication_cost(src, dst, 1.0))
            .sum();
        total / (nodes.len() * nodes.len()) as f64
    }

    /// Replace costs with the observed means of a cost feed.
    ///
    /// Only task types that already have a row are overridden. The `worker`
    /// cost becomes the mean; the `master` cost becomes the feed's
    /// `master_mean` if present, else `mean × master_multiplier`.
    pub fn apply_overrides(&mut self, feed: &CostFeed) -> OverrideReport {
        let mut report = OverrideReport::default();
        let observations = feed.observations(&mut report.warnings);

        for obs in observations {
            let Some(row) = self.exec.get_mut(&obs.task_type) else {
                report.warnings.push(CostFeedWarning::UnrecognizedTaskType {
                    step: obs.step.clone(),
                    task_type: obs.task_type.clone(),
                });
                continue;
            };

            let master = obs
                .master_mean
                .unwrap_or(obs.mean * self.defaults.master_multiplier);
            row.insert(WORKER_CLASS.to_string(), obs.mean);
            row.insert(MASTER_CLASS.to_string(), master);

            debug!(
                task_type = %obs.task_type,
                platform = %obs.platform,
                step = %obs.step,
                worker = obs.mean,
                master,
                "execution cost overridden from feed"
            );

            report.applied.push(AppliedOverride {
                task_type: obs.task_type,
                platform: obs.platform,
                step: obs.step,
                worker: obs.mean,
                master,
            });
        }

        for w in report.warnings.iter() {
            warn!(warning = %w, "cost feed entry ignored");
        }

        report
    }

    /// Load a cost feed from disk and apply it.
    ///
    /// A missing or unreadable file is reported as a warning and leaves the
    /// tables untouched.
    pub fn load_overrides(&mut self, path: impl AsRef<Path>) -> OverrideReport {
        let path = path.as_ref();
        match CostFeed::load(path) {
            Ok(feed) => {
                let report = self.apply_overrides(&feed);
                info!(
                    path = %path.display(),
                    applied = report.applied.len(),
                    warnings = report.warnings.len(),
                    "loaded execution costs from cost feed"
                );
                report
            }
            Err(warning) => {
                warn!(warning = %warning, "could not load cost feed; keeping default costs");
                OverrideReport {
                    applied: Vec::new(),
                    warnings: vec![warning],
                }
            }
        }
    }

    fn zone_pair_cost(&self, from: &str, to: &str) -> Option<f64> {
        self.comm.get(from).and_then(|row| row.get(to)).copied()
    }
}

fn ensure_positive(value: f64, what: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(HeftError::config(format!(
            "{} must be finite and > 0 (got {value})",
            what()
        )))
    }
}

fn ensure_non_negative(value: f64, what: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(HeftError::config(format!(
            "{} must be finite and >= 0 (got {value})",
            what()
        )))
    }
}
