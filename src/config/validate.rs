use std::collections::{BTreeMap, HashMap};

use crate::config::model::{ClusterConfig, RawClusterFile, RawWorkflowFile};
use crate::cost::{CostDefaults, CostModel};
use crate::dag::{Dag, TaskDecl};
use crate::errors::{HeftError, Result};
use crate::fleet::{Fleet, Node};

impl TryFrom<RawClusterFile> for ClusterConfig {
    type Error = HeftError;

    fn try_from(raw: RawClusterFile) -> std::result::Result<Self, Self::Error> {
        let fleet = build_fleet(&raw)?;
        let costs = build_cost_model(raw)?;
        costs.validate_for(&fleet)?;
        Ok(ClusterConfig::new_unchecked(fleet, costs))
    }
}

fn build_fleet(raw: &RawClusterFile) -> Result<Fleet> {
    if raw.node.is_empty() {
        return Err(HeftError::config(
            "cluster config must contain at least one [[node]] entry",
        ));
    }

    let nodes = raw
        .node
        .iter()
        .map(|n| Node::new(&n.id, &n.zone, &n.class, n.capacity))
        .collect();
    Fleet::new(nodes)
}

fn build_cost_model(raw: RawClusterFile) -> Result<CostModel> {
    if raw.exec_cost.is_empty() {
        return Err(HeftError::config(
            "cluster config must contain at least one [exec_cost.<TYPE>] table",
        ));
    }

    let mut comm = Vec::with_capacity(raw.comm_cost.len() * 2);
    for entry in raw.comm_cost.iter() {
        comm.push((entry.from.clone(), entry.to.clone(), entry.cost));
        if entry.symmetric && entry.from != entry.to {
            comm.push((entry.to.clone(), entry.from.clone(), entry.cost));
        }
    }

    let defaults = CostDefaults {
        unknown_task: raw.defaults.unknown_task,
        cross_zone_cost: raw.defaults.cross_zone_cost,
        master_multiplier: raw.defaults.master_multiplier,
    };

    CostModel::new(raw.exec_cost, comm, defaults)
}

impl TryFrom<RawWorkflowFile> for Dag {
    type Error = HeftError;

    /// Derive successor lists (or take the explicit `before` lists) and
    /// validate the resulting graph, so a broken workflow fails at load.
    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        let mut derived: HashMap<&str, Vec<String>> = HashMap::new();
        for task in raw.task.iter() {
            for dep in task.after.iter() {
                derived
                    .entry(dep.as_str())
                    .or_default()
                    .push(task.id.clone());
            }
        }

        let decls = raw
            .task
            .iter()
            .map(|task| TaskDecl {
                id: task.id.clone(),
                task_type: task.task_type.clone(),
                predecessors: task.after.clone(),
                successors: match &task.before {
                    Some(before) => before.clone(),
                    None => derived.get(task.id.as_str()).cloned().unwrap_or_default(),
                },
            })
            .collect();

        let dag = Dag::new(decls);
        dag.validate()?;
        Ok(dag)
    }
}

/// Count of tasks per type; used by the dry-run listing.
pub fn task_type_histogram(dag: &Dag) -> BTreeMap<&str, usize> {
    let mut out = BTreeMap::new();
    for decl in dag.decls() {
        *out.entry(decl.task_type.as_str()).or_insert(0) += 1;
    }
    out
}
