use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::errors::{HeftError, Result};
use crate::types::{TaskId, TaskType};

/// A task as declared by a workflow: type plus explicit edges in both
/// directions.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDecl {
    pub id: TaskId,
    pub task_type: TaskType,
    /// Tasks that must finish before this one starts.
    pub predecessors: Vec<TaskId>,
    /// Tasks that wait for this one.
    pub successors: Vec<TaskId>,
}

impl TaskDecl {
    pub fn new(id: &str, task_type: &str, predecessors: &[&str], successors: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            task_type: task_type.to_string(),
            predecessors: predecessors.iter().map(|s| s.to_string()).collect(),
            successors: successors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Unvalidated workflow: task declarations in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    decls: Vec<TaskDecl>,
}

impl Dag {
    pub fn new(decls: Vec<TaskDecl>) -> Self {
        Self { decls }
    }

    pub fn builder() -> DagBuilder {
        DagBuilder::default()
    }

    pub fn decls(&self) -> &[TaskDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Check references, edge consistency and acyclicity.
    ///
    /// Checks run in this order, so a cyclic graph with a dangling
    /// reference reports the dangling reference:
    /// 1. at least one task, ids non-empty and unique;
    /// 2. every referenced id exists, no self-edges, no repeated edges;
    /// 3. predecessor and successor lists agree;
    /// 4. the graph has a topological order.
    pub fn validate(&self) -> Result<ValidatedDag> {
        if self.decls.is_empty() {
            return Err(HeftError::config("workflow must contain at least one task"));
        }

        let mut index: HashMap<TaskId, usize> = HashMap::with_capacity(self.decls.len());
        for (idx, decl) in self.decls.iter().enumerate() {
            if decl.id.trim().is_empty() {
                return Err(HeftError::config("task id must not be empty"));
            }
            if index.insert(decl.id.clone(), idx).is_some() {
                return Err(HeftError::config(format!(
                    "task '{}' is declared more than once",
                    decl.id
                )));
            }
        }

        let mut tasks = Vec::with_capacity(self.decls.len());
        for decl in self.decls.iter() {
            let predecessors = resolve_edges(decl, &decl.predecessors, "predecessor", &index)?;
            let successors = resolve_edges(decl, &decl.successors, "successor", &index)?;
            tasks.push(DagTask {
                id: decl.id.clone(),
                task_type: decl.task_type.clone(),
                predecessors,
                successors,
            });
        }

        check_mutual_consistency(&tasks)?;
        let topo_order = topological_order(&tasks)?;

        debug!(tasks = tasks.len(), "workflow DAG validated");

        Ok(ValidatedDag {
            tasks,
            index,
            topo_order,
        })
    }
}

fn resolve_edges(
    decl: &TaskDecl,
    ids: &[TaskId],
    role: &str,
    index: &HashMap<TaskId, usize>,
) -> Result<Vec<usize>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(ids.len());
    for other in ids {
        if *other == decl.id {
            return Err(HeftError::config(format!(
                "task '{}' cannot be its own {role}",
                decl.id
            )));
        }
        let idx = *index.get(other).ok_or_else(|| {
            HeftError::config(format!(
                "task '{}' has unknown {role} '{other}'",
                decl.id
            ))
        })?;
        if !seen.insert(idx) {
            return Err(HeftError::config(format!(
                "task '{}' lists {role} '{other}' more than once",
                decl.id
            )));
        }
        out.push(idx);
    }
    Ok(out)
}

fn check_mutual_consistency(tasks: &[DagTask]) -> Result<()> {
    for task in tasks {
        for &succ in task.successors.iter() {
            if !tasks[succ].predecessors.iter().any(|&p| tasks[p].id == task.id) {
                return Err(HeftError::config(format!(
                    "task '{}' lists '{}' as successor but '{}' does not list '{}' as predecessor",
                    task.id, tasks[succ].id, tasks[succ].id, task.id
                )));
            }
        }
        for &pred in task.predecessors.iter() {
            if !tasks[pred].successors.iter().any(|&s| tasks[s].id == task.id) {
                return Err(HeftError::config(format!(
                    "task '{}' lists '{}' as predecessor but '{}' does not list '{}' as successor",
                    task.id, tasks[pred].id, tasks[pred].id, task.id
                )));
            }
        }
    }
    Ok(())
}

fn topological_order(tasks: &[DagTask]) -> Result<Vec<usize>> {
    // Edge direction: predecessor -> task. Node weights are arena positions,
    // and nodes are added in arena order so NodeIndex == position.
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
    for idx in 0..tasks.len() {
        graph.add_node(idx);
    }
    for (idx, task) in tasks.iter().enumerate() {
        for &pred in task.predecessors.iter() {
            graph.add_edge(NodeIndex::new(pred), NodeIndex::new(idx), ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|n| graph[n]).collect()),
        Err(cycle) => Err(HeftError::DagCycle {
            task: tasks[graph[cycle.node_id()]].id.clone(),
        }),
    }
}

/// A task in a validated DAG; edges are arena positions.
#[derive(Debug, Clone)]
pub struct DagTask {
    pub id: TaskId,
    pub task_type: TaskType,
    pub predecessors: Vec<usize>,
    pub successors: Vec<usize>,
}

impl DagTask {
    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}

/// An acyclic, internally consistent task graph.
///
/// Tasks live in an arena in declaration order; the position of a task is
/// its declaration rank and the tie-break key used by the scheduler.
#[derive(Debug, Clone)]
pub struct ValidatedDag {
    tasks: Vec<DagTask>,
    index: HashMap<TaskId, usize>,
    topo_order: Vec<usize>,
}

impl ValidatedDag {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[DagTask] {
        &self.tasks
    }

    pub fn task(&self, idx: usize) -> &DagTask {
        &self.tasks[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Arena positions such that every predecessor precedes its successors.
    pub fn topological_order(&self) -> &[usize] {
        &self.topo_order
    }

    /// Arena positions such that every successor precedes its predecessors.
    pub fn reverse_topological_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.topo_order.iter().rev().copied()
    }

    /// Number of precedence edges.
    pub fn edge_count(&self) -> usize {
        self.tasks.iter().map(|t| t.successors.len()).sum()
    }
}

/// Builder that declares `after` edges only and derives successor lists,
/// so the result is always mutually consistent.
#[derive(Debug, Clone, Default)]
pub struct DagBuilder {
    decls: Vec<TaskDecl>,
}

impl DagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a task with no predecessors.
    pub fn task(self, id: &str, task_type: &str) -> Self {
        self.task_after(id, task_type, &[])
    }

    /// Declare a task that waits for every task in `after`.
    pub fn task_after(mut self, id: &str, task_type: &str, after: &[&str]) -> Self {
        self.decls.push(TaskDecl::new(id, task_type, after, &[]));
        self
    }

    pub fn build(self) -> Dag {
        let mut decls = self.decls;
        let position: HashMap<TaskId, usize> = decls
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.id.clone(), idx))
            .collect();
        let mut edges: Vec<(usize, TaskId)> = Vec::new();
        for decl in decls.iter() {
            for pred in decl.predecessors.iter() {
                if let Some(&p) = position.get(pred) {
                    edges.push((p, decl.id.clone()));
                }
            }
        }

        // Unknown predecessors are left for `Dag::validate` to report.
        for (pred, succ) in edges {
            let successors = &mut decls[pred].successors;
            if !successors.contains(&succ) {
                successors.push(succ);
            }
        }

        Dag::new(decls)
    }
}
