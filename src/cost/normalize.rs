// src/cost/normalize.rs

//! Mapping from benchmark step names to task types.
//!
//! Step names are canonicalized (upper-cased, `-` and spaces turned into
//! `_`) only to look them up in [`KNOWN_STEPS`]. A name that is not in the
//! table becomes its own task type, upper-cased but otherwise literal.

use crate::types::TaskType;

/// Canonical step name → task type.
pub const KNOWN_STEPS: &[(&str, &str)] = &[
    ("INIT", "INITIALIZE"),
    ("INITIALIZE", "INITIALIZE"),
    ("HEALTH_CHECK", "HEALTH_CHECK"),
    ("HEALTH_CHECK_1", "HEALTH_CHECK"),
    ("HEALTH_CHECK_2", "HEALTH_CHECK"),
    ("HEALTH_CHECK_3", "HEALTH_CHECK"),
    ("HEALTH_CHECKS_PARALLEL", "HEALTH_CHECK"),
    ("NODE_SIM", "NODE_SIMULATION"),
    ("NODE_SIMULATION", "NODE_SIMULATION"),
    ("NODE_SIMULATION_1", "NODE_SIMULATION"),
    ("NODE_SIMULATION_2", "NODE_SIMULATION"),
    ("NODE_FAILURE_SIM", "NODE_SIMULATION"),
    ("RACK_SIM", "RACK_SIMULATION"),
    ("RACK_SIMULATION", "RACK_SIMULATION"),
    ("RACK_SIMULATION_1", "RACK_SIMULATION"),
    ("RACK_SIMULATION_2", "RACK_SIMULATION"),
    ("RACK_FAILURE_SIM", "RACK_SIMULATION"),
    ("INTERIM_HEALTH_CHECK", "INTERIM_HEALTH_CHECK"),
    ("INTERIM_HEALTH_CHECK_1", "INTERIM_HEALTH_CHECK"),
    ("INTERIM_HEALTH_CHECK_2", "INTERIM_HEALTH_CHECK"),
    ("FINAL_HEALTH_CHECK", "FINAL_HEALTH_CHECK"),
];

/// Upper-case and unify separators: `"node-simulation"` → `"NODE_SIMULATION"`.
pub fn canonical_step_name(step: &str) -> String {
    step.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Resolve a step name to the task type whose costs it describes.
pub fn task_type_for_step(step: &str) -> TaskType {
    let canonical = canonical_step_name(step);
    KNOWN_STEPS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, task_type)| task_type.to_string())
        .unwrap_or_else(|| step.trim().to_uppercase())
}
