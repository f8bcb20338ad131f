use std::collections::BTreeMap;

use serde::Deserialize;

use crate::cost::{
    CostModel, DEFAULT_CROSS_ZONE_COST, DEFAULT_MASTER_MULTIPLIER, DEFAULT_UNKNOWN_MASTER_COST,
    DEFAULT_UNKNOWN_WORKER_COST, MASTER_CLASS, WORKER_CLASS,
};
use crate::fleet::Fleet;

/// Cluster description as read from a TOML file.
///
/// ```toml
/// [[node]]
/// id = "worker-w001"
/// zone = "R1"
/// class = "worker"
/// capacity = 1.0
///
/// [exec_cost.HEALTH_CHECK]
/// master = 35
/// worker = 25
///
/// [[comm_cost]]
/// from = "R1"
/// to = "R2"
/// cost = 1.5
/// symmetric = true
///
/// [defaults]
/// cross_zone_cost = 1.0
/// master_multiplier = 1.2
/// unknown_task = { master = 100, worker = 80 }
/// ```
///
/// `[[node]]` is an array so declaration order survives parsing; that
/// order breaks ties between equally good nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClusterFile {
    #[serde(default)]
    pub node: Vec<NodeConfig>,

    /// `[exec_cost.<TASK_TYPE>]`: node class → base cost.
    #[serde(default)]
    pub exec_cost: BTreeMap<String, BTreeMap<String, f64>>,

    #[serde(default)]
    pub comm_cost: Vec<CommCostConfig>,

    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// `[[node]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    pub zone: String,
    pub class: String,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
}

fn default_capacity() -> f64 {
    1.0
}

/// `[[comm_cost]]` entry: cost per unit of data from one zone to another.
#[derive(Debug, Clone, Deserialize)]
pub struct CommCostConfig {
    pub from: String,
    pub to: String,
    pub cost: f64,
    /// Also declare `to -> from` with the same cost.
    #[serde(default)]
    pub symmetric: bool,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsSection {
    /// Cost of an ordered zone pair missing from `[[comm_cost]]`.
    #[serde(default = "default_cross_zone_cost")]
    pub cross_zone_cost: f64,

    /// `master` cost = feed mean × this, when the feed carries no master data.
    #[serde(default = "default_master_multiplier")]
    pub master_multiplier: f64,

    /// Costs used for task types missing from `[exec_cost]`.
    #[serde(default = "default_unknown_task")]
    pub unknown_task: BTreeMap<String, f64>,
}

fn default_cross_zone_cost() -> f64 {
    DEFAULT_CROSS_ZONE_COST
}

fn default_master_multiplier() -> f64 {
    DEFAULT_MASTER_MULTIPLIER
}

fn default_unknown_task() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (MASTER_CLASS.to_string(), DEFAULT_UNKNOWN_MASTER_COST),
        (WORKER_CLASS.to_string(), DEFAULT_UNKNOWN_WORKER_COST),
    ])
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            cross_zone_cost: default_cross_zone_cost(),
            master_multiplier: default_master_multiplier(),
            unknown_task: default_unknown_task(),
        }
    }
}

/// Validated cluster: fleet plus a cost model known to cover it.
///
/// Only constructible through `TryFrom<RawClusterFile>`.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub(crate) fleet: Fleet,
    pub(crate) costs: CostModel,
}

impl ClusterConfig {
    pub(crate) fn new_unchecked(fleet: Fleet, costs: CostModel) -> Self {
        Self { fleet, costs }
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    /// Mutable access for applying a cost feed before planning starts.
    pub fn costs_mut(&mut self) -> &mut CostModel {
        &mut self.costs
    }
}

/// Workflow definition as read from a TOML file.
///
/// ```toml
/// [[task]]
/// id = "initialize"
/// type = "INITIALIZE"
///
/// [[task]]
/// id = "health-check-1"
/// type = "HEALTH_CHECK"
/// after = ["initialize"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWorkflowFile {
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: String,

    /// Row of the execution-cost table.
    #[serde(rename = "type")]
    pub task_type: String,

    /// Predecessors: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<String>,

    /// Optional explicit successors. When present it must agree with the
    /// `after` lists of the other tasks; when absent it is derived.
    #[serde(default)]
    pub before: Option<Vec<String>>,
}
