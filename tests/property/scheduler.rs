use std::collections::{BTreeMap, HashSet};

use heftplan::config::ClusterConfig;
use heftplan::cost::{MASTER_CLASS, WORKER_CLASS};
use heftplan::dag::Dag;
use heftplan::heft::{self, HeftScheduler, SchedulerPhase, TaskState};
use heftplan_test_utils::{approx_eq, approx_le};
use heftplan_test_utils::builders::{ClusterBuilder, TaskConfigBuilder, WorkflowBuilder};
use proptest::prelude::*;

const ZONES: [&str; 3] = ["Z0", "Z1", "Z2"];
const TASK_TYPES: [&str; 3] = ["T0", "T1", "T2"];

#[derive(Debug, Clone)]
struct Scenario {
    cluster: ClusterConfig,
    dag: Dag,
}

// Fleet of 1..6 nodes over three zones; every cost strictly positive so
// ranks strictly decrease along edges.
fn cluster_strategy() -> impl Strategy<Value = ClusterConfig> {
    let nodes = proptest::collection::vec((0..ZONES.len(), any::<bool>(), 0.5f64..2.0), 1..6);
    let exec = proptest::collection::vec((1.0f64..50.0, 1.0f64..50.0), TASK_TYPES.len());
    let comm = proptest::collection::vec(0.0f64..5.0, ZONES.len() * ZONES.len());

    (nodes, exec, comm).prop_map(|(nodes, exec, comm)| {
        let mut builder = ClusterBuilder::new();
        for (i, (zone, is_master, capacity)) in nodes.into_iter().enumerate() {
            let class = if is_master { MASTER_CLASS } else { WORKER_CLASS };
            builder = builder.with_node(&format!("n{i}"), ZONES[zone], class, capacity);
        }
        for (task_type, (master, worker)) in TASK_TYPES.iter().zip(exec) {
            builder = builder.with_exec_cost(task_type, &[(MASTER_CLASS, master), (WORKER_CLASS, worker)]);
        }
        for (k, cost) in comm.into_iter().enumerate() {
            builder = builder.with_comm(ZONES[k / ZONES.len()], ZONES[k % ZONES.len()], cost);
        }
        builder.build()
    })
}

// Acyclic by construction: task N may only depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Dag> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_tasks,
        );
        let types = proptest::collection::vec(0..TASK_TYPES.len(), num_tasks);

        (deps, types).prop_map(|(raw_deps, types)| {
            let mut builder = WorkflowBuilder::new();
            for (i, (potential, type_idx)) in raw_deps.into_iter().zip(types).enumerate() {
                let mut task = TaskConfigBuilder::new(&format!("task_{i}"), TASK_TYPES[type_idx]);

                let mut seen = HashSet::new();
                for dep_idx in potential {
                    if i > 0 && seen.insert(dep_idx % i) {
                        task = task.after(&format!("task_{}", dep_idx % i));
                    }
                }
                builder = builder.with_task(task.build());
            }
            builder.build()
        })
    })
}

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (cluster_strategy(), dag_strategy(12)).prop_map(|(cluster, dag)| Scenario { cluster, dag })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_task_is_placed_once_with_its_own_duration(s in scenario_strategy()) {
        let fleet = s.cluster.fleet();
        let costs = s.cluster.costs();
        let schedule = heft::plan(fleet, costs, &s.dag).unwrap();

        prop_assert_eq!(schedule.len(), s.dag.len());
        for decl in s.dag.decls() {
            let a = schedule.get(&decl.id).unwrap();
            let node = fleet.node(&a.node).unwrap();
            prop_assert_eq!(&a.zone, &node.zone);
            let expected = costs.execution_cost(&decl.task_type, node);
            prop_assert!(approx_eq(a.duration(), expected));
        }
    }

    #[test]
    fn precedence_includes_communication_delay(s in scenario_strategy()) {
        let fleet = s.cluster.fleet();
        let costs = s.cluster.costs();
        let schedule = heft::plan(fleet, costs, &s.dag).unwrap();

        for decl in s.dag.decls() {
            let a = schedule.get(&decl.id).unwrap();
            let dst = fleet.node(&a.node).unwrap();
            for pred in decl.predecessors.iter() {
                let p = schedule.get(pred).unwrap();
                let src = fleet.node(&p.node).unwrap();
                let arrival = p.end + costs.communication_cost(src, dst, 1.0);
                prop_assert!(approx_le(arrival, a.start), "{} starts before {} delivers", decl.id, pred);
            }
        }
    }

    #[test]
    fn tasks_on_one_node_never_overlap(s in scenario_strategy()) {
        let schedule = heft::plan(s.cluster.fleet(), s.cluster.costs(), &s.dag).unwrap();

        let mut per_node: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for a in schedule.assignments() {
            per_node.entry(a.node.as_str()).or_default().push((a.start, a.end));
        }
        for slots in per_node.values_mut() {
            slots.sort_by(|x, y| x.0.total_cmp(&y.0));
            for pair in slots.windows(2) {
                prop_assert!(approx_le(pair[0].1, pair[1].0));
            }
        }
    }

    #[test]
    fn ranks_follow_the_upward_recurrence(s in scenario_strategy()) {
        let fleet = s.cluster.fleet();
        let costs = s.cluster.costs();
        let mut scheduler = HeftScheduler::new(fleet, costs, &s.dag).unwrap();
        prop_assert!(scheduler.rank_of("task_0").is_none());
        scheduler.compute_ranks().unwrap();
        prop_assert_eq!(scheduler.phase(), SchedulerPhase::AllRanked);

        let avg_comm = costs.average_communication_cost(fleet);
        for decl in s.dag.decls() {
            prop_assert_eq!(scheduler.task_state(&decl.id), Some(TaskState::Ranked));
            let rank = scheduler.rank_of(&decl.id).unwrap();
            let avg_exec = costs.average_execution_cost(&decl.task_type, fleet);

            if decl.successors.is_empty() {
                prop_assert_eq!(rank, avg_exec);
            }
            for succ in decl.successors.iter() {
                let succ_rank = scheduler.rank_of(succ).unwrap();
                prop_assert!(approx_le(avg_exec + avg_comm + succ_rank, rank));
                prop_assert!(succ_rank < rank);
            }
        }

        // Priority order is a topological order.
        let order = scheduler.priority_order().unwrap();
        let position: BTreeMap<usize, usize> =
            order.iter().enumerate().map(|(pos, &idx)| (idx, pos)).collect();
        for (idx, task) in scheduler.dag().tasks().iter().enumerate() {
            for pred in task.predecessors.iter() {
                prop_assert!(position[pred] < position[&idx]);
            }
        }
    }

    #[test]
    fn node_availability_only_moves_forward(s in scenario_strategy()) {
        let fleet = s.cluster.fleet();
        let mut scheduler = HeftScheduler::new(fleet, s.cluster.costs(), &s.dag).unwrap();
        scheduler.compute_ranks().unwrap();
        scheduler.assign_all().unwrap();

        let mut last: BTreeMap<&str, f64> = BTreeMap::new();
        for step in scheduler.steps() {
            prop_assert!(step.availability_after >= step.availability_before);
            prop_assert!(step.start >= step.availability_before);
            let prev = last.insert(step.node.as_str(), step.availability_after).unwrap_or(0.0);
            prop_assert_eq!(prev, step.availability_before);
        }
        for node in fleet.nodes() {
            let expected = last.get(node.id.as_str()).copied().unwrap_or(0.0);
            prop_assert_eq!(scheduler.availability_of(&node.id).unwrap(), expected);
        }
    }

    #[test]
    fn makespan_stays_within_simple_bounds(s in scenario_strategy()) {
        let fleet = s.cluster.fleet();
        let costs = s.cluster.costs();
        let schedule = heft::plan(fleet, costs, &s.dag).unwrap();

        // (cheapest, most expensive) execution of a task type over the fleet.
        let exec_range = |task_type: &str| -> (f64, f64) {
            fleet
                .nodes()
                .iter()
                .map(|n| costs.execution_cost(task_type, n))
                .fold((f64::INFINITY, 0.0), |(lo, hi), c| (lo.min(c), hi.max(c)))
        };
        let max_comm = fleet
            .nodes()
            .iter()
            .flat_map(|a| fleet.nodes().iter().map(move |b| (a, b)))
            .map(|(a, b)| costs.communication_cost(a, b, 1.0))
            .fold(0.0, f64::max);

        // Each decision extends the makespan by at most one task's worst
        // execution plus the worst transfer.
        let upper: f64 = s
            .dag
            .decls()
            .iter()
            .map(|d| exec_range(&d.task_type).1 + max_comm)
            .sum();
        prop_assert!(approx_le(schedule.makespan(), upper));

        // Longest chain of cheapest executions.
        let dag = s.dag.validate().unwrap();
        let mut earliest = vec![0.0f64; dag.len()];
        for &idx in dag.topological_order() {
            let task = dag.task(idx);
            let ready = task.predecessors.iter().map(|&p| earliest[p]).fold(0.0, f64::max);
            earliest[idx] = ready + exec_range(&task.task_type).0;
        }
        let lower = earliest.into_iter().fold(0.0, f64::max);
        prop_assert!(approx_le(lower, schedule.makespan() * (1.0 + 1e-12)));
    }

    #[test]
    fn planning_is_deterministic(s in scenario_strategy()) {
        let first = heft::plan(s.cluster.fleet(), s.cluster.costs(), &s.dag).unwrap();
        let second = heft::plan(s.cluster.fleet(), s.cluster.costs(), &s.dag).unwrap();
        prop_assert_eq!(first.assignments(), second.assignments());
    }
}
