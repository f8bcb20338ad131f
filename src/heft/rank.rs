// src/heft/rank.rs

//! Upward rank (`rank_u`).
//!
//! ```text
//! rank(t) = avgExec(t)                                   if t is a sink
//! rank(t) = avgExec(t) + max_s (avgComm + rank(s))       otherwise
//! ```
//!
//! `avgComm` is one fleet-wide value (mean over all ordered node pairs), so
//! it does not depend on where `t` or `s` will run. Ranks are filled in
//! reverse topological order; every successor is final before its
//! predecessors read it, and no recursion is involved.

use crate::cost::CostModel;
use crate::dag::ValidatedDag;
use crate::fleet::Fleet;

/// Upward rank of every task, indexed by arena position.
pub fn upward_ranks(dag: &ValidatedDag, fleet: &Fleet, costs: &CostModel) -> Vec<f64> {
    let avg_comm = costs.average_communication_cost(fleet);
    let mut ranks: Vec<Option<f64>> = vec![None; dag.len()];

    for idx in dag.reverse_topological_order() {
        let task = dag.task(idx);
        let avg_exec = costs.average_execution_cost(&task.task_type, fleet);

        let tail = task
            .successors
            .iter()
            .filter_map(|&s| ranks[s])
            .map(|succ_rank| avg_comm + succ_rank)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        ranks[idx] = Some(avg_exec + tail.unwrap_or(0.0));
    }

    // Reverse topological order covers every task exactly once.
    ranks.into_iter().map(|r| r.unwrap_or(0.0)).collect()
}
