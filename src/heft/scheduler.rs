use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info};

use crate::cost::CostModel;
use crate::dag::{Dag, ValidatedDag};
use crate::errors::{HeftError, Result};
use crate::fleet::Fleet;
use crate::heft::rank::upward_ranks;
use crate::heft::state::{SchedulerPhase, TaskState};
use crate::heft::step::AssignmentStep;
use crate::schedule::{Assignment, Schedule};

/// Where and when a task was placed; arena positions only.
#[derive(Debug, Clone, Copy)]
struct Placement {
    node: usize,
    end: f64,
}

/// Heap entry for the priority list: higher rank first, then lower
/// declaration position.
#[derive(Debug, Clone, Copy)]
struct Ready {
    rank: f64,
    idx: usize,
}

impl Ord for Ready {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .total_cmp(&other.rank)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ready {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ready {}

/// One HEFT planning run.
///
/// Borrows the fleet and cost model for its whole lifetime, so neither can
/// change mid-run. Owns the validated DAG, the working schedule and the
/// per-node availability.
///
/// Phases advance strictly `Initialized → AllRanked → AllScheduled`:
/// - [`HeftScheduler::new`] validates inputs;
/// - [`HeftScheduler::compute_ranks`] fills the upward ranks;
/// - [`HeftScheduler::assign_all`] places every task.
#[derive(Debug)]
pub struct HeftScheduler<'a> {
    fleet: &'a Fleet,
    costs: &'a CostModel,
    dag: ValidatedDag,
    phase: SchedulerPhase,
    states: Vec<TaskState>,
    ranks: Vec<f64>,
    placements: Vec<Option<Placement>>,
    /// Earliest time each node (fleet order) is free.
    availability: Vec<f64>,
    schedule: Schedule,
    steps: Vec<AssignmentStep>,
}

impl<'a> HeftScheduler<'a> {
    /// Validate the DAG and check that `costs` can price every node of
    /// `fleet`. Any failure here is fatal for the run.
    pub fn new(fleet: &'a Fleet, costs: &'a CostModel, dag: &Dag) -> Result<Self> {
        let dag = dag.validate()?;
        costs.validate_for(fleet)?;

        let n = dag.len();
        Ok(Self {
            fleet,
            costs,
            dag,
            phase: SchedulerPhase::Initialized,
            states: vec![TaskState::Unranked; n],
            ranks: vec![0.0; n],
            placements: vec![None; n],
            availability: vec![0.0; fleet.len()],
            schedule: Schedule::new(),
            steps: Vec::with_capacity(n),
        })
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn dag(&self) -> &ValidatedDag {
        &self.dag
    }

    pub fn task_state(&self, task: &str) -> Option<TaskState> {
        self.dag.index_of(task).map(|idx| self.states[idx])
    }

    /// Upward rank of a task, once ranks have been computed.
    pub fn rank_of(&self, task: &str) -> Option<f64> {
        if self.phase == SchedulerPhase::Initialized {
            return None;
        }
        self.dag.index_of(task).map(|idx| self.ranks[idx])
    }

    /// Current availability of a node.
    pub fn availability_of(&self, node: &str) -> Result<f64> {
        let idx = self
            .fleet
            .index_of(node)
            .ok_or_else(|| HeftError::UnknownNode(node.to_string()))?;
        Ok(self.availability[idx])
    }

    /// Assignment decisions made so far, in order.
    pub fn steps(&self) -> &[AssignmentStep] {
        &self.steps
    }

    /// Working schedule (complete once the phase is `AllScheduled`).
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// `Initialized → AllRanked`.
    pub fn compute_ranks(&mut self) -> Result<()> {
        self.expect_phase(SchedulerPhase::Initialized)?;

        self.ranks = upward_ranks(&self.dag, self.fleet, self.costs);
        for state in self.states.iter_mut() {
            *state = TaskState::Ranked;
        }
        self.phase = SchedulerPhase::AllRanked;

        debug!(tasks = self.ranks.len(), "upward ranks computed");
        Ok(())
    }

    /// Tasks by descending rank; ties keep declaration order.
    ///
    /// A task is released only after all of its predecessors, so a
    /// producer whose rank rounds down to its consumer's still goes first.
    /// With strictly decreasing ranks this is the plain rank order.
    pub fn priority_order(&self) -> Result<Vec<usize>> {
        if self.phase == SchedulerPhase::Initialized {
            return Err(HeftError::InvalidPhase {
                expected: SchedulerPhase::AllRanked,
                actual: self.phase,
            });
        }

        let tasks = self.dag.tasks();
        let mut waiting: Vec<usize> = tasks.iter().map(|t| t.predecessors.len()).collect();
        let mut ready: BinaryHeap<Ready> = waiting
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w == 0)
            .map(|(idx, _)| Ready {
                rank: self.ranks[idx],
                idx,
            })
            .collect();

        let mut order = Vec::with_capacity(tasks.len());
        while let Some(Ready { idx, .. }) = ready.pop() {
            order.push(idx);
            for &succ in tasks[idx].successors.iter() {
                waiting[succ] -= 1;
                if waiting[succ] == 0 {
                    ready.push(Ready {
                        rank: self.ranks[succ],
                        idx: succ,
                    });
                }
            }
        }
        Ok(order)
    }

    /// `AllRanked → AllScheduled`: place every task on the node giving its
    /// earliest finish time.
    pub fn assign_all(&mut self) -> Result<()> {
        self.expect_phase(SchedulerPhase::AllRanked)?;

        for idx in self.priority_order()? {
            self.assign(idx)?;
        }
        self.phase = SchedulerPhase::AllScheduled;

        info!(
            tasks = self.schedule.len(),
            nodes_used = self.schedule.exclusion_summary().exclude_nodes.len(),
            makespan = self.schedule.makespan(),
            "HEFT schedule complete"
        );
        Ok(())
    }

    /// Run every remaining phase and hand out the finished schedule.
    pub fn run(mut self) -> Result<Schedule> {
        if self.phase == SchedulerPhase::Initialized {
            self.compute_ranks()?;
        }
        if self.phase == SchedulerPhase::AllRanked {
            self.assign_all()?;
        }
        self.into_schedule()
    }

    /// The finished schedule; only valid in `AllScheduled`.
    pub fn into_schedule(self) -> Result<Schedule> {
        self.expect_phase(SchedulerPhase::AllScheduled)?;
        Ok(self.schedule)
    }

    /// `max(avail(n), max_p(end(p) + comm(node(p), n)))`.
    fn ready_time(&self, idx: usize, node_idx: usize) -> Result<f64> {
        let task = self.dag.task(idx);
        let node = &self.fleet.nodes()[node_idx];

        let mut ready = self.availability[node_idx];
        for &pred in task.predecessors.iter() {
            let placed = self.placements[pred].ok_or_else(|| HeftError::UnscheduledPredecessor {
                task: task.id.clone(),
                predecessor: self.dag.task(pred).id.clone(),
            })?;
            let src = &self.fleet.nodes()[placed.node];
            ready = ready.max(placed.end + self.costs.communication_cost(src, node, 1.0));
        }
        Ok(ready)
    }

    fn assign(&mut self, idx: usize) -> Result<()> {
        let task = self.dag.task(idx);

        // (node, start, finish); strict `<` keeps the first node in fleet
        // order on ties.
        let mut best: Option<(usize, f64, f64)> = None;
        for (node_idx, node) in self.fleet.nodes().iter().enumerate() {
            let start = self.ready_time(idx, node_idx)?;
            let finish = start + self.costs.execution_cost(&task.task_type, node);
            match best {
                Some((_, _, best_finish)) if finish >= best_finish => {}
                _ => best = Some((node_idx, start, finish)),
            }
        }
        let (node_idx, start, finish) =
            best.ok_or_else(|| HeftError::config("fleet must contain at least one node"))?;

        let node = &self.fleet.nodes()[node_idx];
        let before = self.availability[node_idx];

        debug!(
            task = %task.id,
            node = %node.id,
            zone = %node.zone,
            start,
            finish,
            rank = self.ranks[idx],
            "task assigned"
        );

        self.schedule.record(Assignment {
            task: task.id.clone(),
            task_type: task.task_type.clone(),
            node: node.id.clone(),
            zone: node.zone.clone(),
            start,
            end: finish,
            rank: self.ranks[idx],
        })?;
        self.steps.push(AssignmentStep {
            task: task.id.clone(),
            node: node.id.clone(),
            start,
            finish,
            availability_before: before,
            availability_after: finish,
        });

        self.placements[idx] = Some(Placement {
            node: node_idx,
            end: finish,
        });
        self.availability[node_idx] = finish;
        self.states[idx] = TaskState::Scheduled;
        Ok(())
    }

    fn expect_phase(&self, expected: SchedulerPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(HeftError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
