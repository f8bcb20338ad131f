// src/dag/builtin.rs

use crate::dag::graph::{Dag, TaskDecl};

/// The resilience-simulation workflow:
///
/// ```text
/// initialize -> {health-check-1, health-check-2, health-check-3}
///            -> node-simulation -> interim-health-check
///            -> rack-simulation -> final-health-check
/// ```
pub fn resilience_workflow() -> Dag {
    let checks = ["health-check-1", "health-check-2", "health-check-3"];

    let mut decls = vec![TaskDecl::new("initialize", "INITIALIZE", &[], &checks)];
    for check in checks {
        decls.push(TaskDecl::new(
            check,
            "HEALTH_CHECK",
            &["initialize"],
            &["node-simulation"],
        ));
    }
    decls.extend([
        TaskDecl::new(
            "node-simulation",
            "NODE_SIMULATION",
            &checks,
            &["interim-health-check"],
        ),
        TaskDecl::new(
            "interim-health-check",
            "INTERIM_HEALTH_CHECK",
            &["node-simulation"],
            &["rack-simulation"],
        ),
        TaskDecl::new(
            "rack-simulation",
            "RACK_SIMULATION",
            &["interim-health-check"],
            &["final-health-check"],
        ),
        TaskDecl::new(
            "final-health-check",
            "FINAL_HEALTH_CHECK",
            &["rack-simulation"],
            &[],
        ),
    ]);

    Dag::new(decls)
}
