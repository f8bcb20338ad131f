// src/config/builtin.rs

use std::collections::BTreeMap;

use crate::config::model::{ClusterConfig, CommCostConfig, DefaultsSection, NodeConfig, RawClusterFile};
use crate::cost::{MASTER_CLASS, WORKER_CLASS};
use crate::errors::Result;

/// Base execution costs (seconds) per task type: (master, worker).
const BUILTIN_EXEC_COSTS: &[(&str, f64, f64)] = &[
    ("HEALTH_CHECK", 35.0, 25.0),
    ("NODE_SIMULATION", 180.0, 150.0),
    ("RACK_SIMULATION", 380.0, 350.0),
    ("INTERIM_HEALTH_CHECK", 30.0, 20.0),
    ("FINAL_HEALTH_CHECK", 30.0, 20.0),
    ("INITIALIZE", 15.0, 12.0),
];

const INTRA_ZONE_COST: f64 = 0.1;

/// Cross-zone costs; each pair applies in both directions.
const BUILTIN_CROSS_ZONE: &[(&str, &str, f64)] = &[
    ("R1", "R2", 1.5),
    ("R1", "R3", 2.0),
    ("R2", "R3", 1.5),
];

/// Three zones, each with one master (capacity 0.8) and two workers
/// (capacity 1.0). Masters are declared first.
pub fn builtin_raw_cluster() -> RawClusterFile {
    let zones = ["R1", "R2", "R3"];

    let mut node = Vec::new();
    for (i, zone) in zones.iter().enumerate() {
        node.push(NodeConfig {
            id: format!("master-m{:03}", i + 1),
            zone: zone.to_string(),
            class: MASTER_CLASS.to_string(),
            capacity: 0.8,
        });
    }
    for (i, zone) in zones.iter().flat_map(|z| [z, z]).enumerate() {
        node.push(NodeConfig {
            id: format!("worker-w{:03}", i + 1),
            zone: zone.to_string(),
            class: WORKER_CLASS.to_string(),
            capacity: 1.0,
        });
    }

    let exec_cost = BUILTIN_EXEC_COSTS
        .iter()
        .map(|(task_type, master, worker)| {
            (
                task_type.to_string(),
                BTreeMap::from([
                    (MASTER_CLASS.to_string(), *master),
                    (WORKER_CLASS.to_string(), *worker),
                ]),
            )
        })
        .collect();

    let mut comm_cost: Vec<CommCostConfig> = zones
        .iter()
        .map(|z| CommCostConfig {
            from: z.to_string(),
            to: z.to_string(),
            cost: INTRA_ZONE_COST,
            symmetric: false,
        })
        .collect();
    comm_cost.extend(BUILTIN_CROSS_ZONE.iter().map(|(from, to, cost)| CommCostConfig {
        from: from.to_string(),
        to: to.to_string(),
        cost: *cost,
        symmetric: true,
    }));

    RawClusterFile {
        node,
        exec_cost,
        comm_cost,
        defaults: DefaultsSection::default(),
    }
}

/// The built-in cluster, validated.
pub fn builtin_cluster() -> Result<ClusterConfig> {
    ClusterConfig::try_from(builtin_raw_cluster())
}
