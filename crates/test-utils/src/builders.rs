#![allow(dead_code)]

use std::collections::BTreeMap;

use heftplan::config::{
    ClusterConfig, CommCostConfig, DefaultsSection, NodeConfig, RawClusterFile, RawWorkflowFile,
    TaskConfig,
};
use heftplan::dag::Dag;

/// Builder for `ClusterConfig` to simplify test setup.
pub struct ClusterBuilder {
    config: RawClusterFile,
}

impl ClusterBuilder {
    pub fn new() -> Self {
        Self {
            config: RawClusterFile {
                node: Vec::new(),
                exec_cost: BTreeMap::new(),
                comm_cost: Vec::new(),
                defaults: DefaultsSection::default(),
            },
        }
    }

    pub fn with_node(mut self, id: &str, zone: &str, class: &str, capacity: f64) -> Self {
        self.config.node.push(NodeConfig {
            id: id.to_string(),
            zone: zone.to_string(),
            class: class.to_string(),
            capacity,
        });
        self
    }

    pub fn with_exec_cost(mut self, task_type: &str, costs: &[(&str, f64)]) -> Self {
        let row = self.config.exec_cost.entry(task_type.to_string()).or_default();
        for (class, cost) in costs {
            row.insert(class.to_string(), *cost);
        }
        self
    }

    pub fn with_comm(mut self, from: &str, to: &str, cost: f64) -> Self {
        self.config.comm_cost.push(CommCostConfig {
            from: from.to_string(),
            to: to.to_string(),
            cost,
            symmetric: false,
        });
        self
    }

    pub fn with_symmetric_comm(mut self, a: &str, b: &str, cost: f64) -> Self {
        self.config.comm_cost.push(CommCostConfig {
            from: a.to_string(),
            to: b.to_string(),
            cost,
            symmetric: true,
        });
        self
    }

    pub fn with_cross_zone_default(mut self, cost: f64) -> Self {
        self.config.defaults.cross_zone_cost = cost;
        self
    }

    pub fn raw(self) -> RawClusterFile {
        self.config
    }

    pub fn build(self) -> ClusterConfig {
        ClusterConfig::try_from(self.config).expect("Failed to build valid cluster from builder")
    }
}

impl Default for ClusterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for workflow files, mirroring `[[task]]` entries.
pub struct WorkflowBuilder {
    workflow: RawWorkflowFile,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            workflow: RawWorkflowFile::default(),
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.workflow.task.push(task);
        self
    }

    pub fn raw(self) -> RawWorkflowFile {
        self.workflow
    }

    pub fn build(self) -> Dag {
        Dag::try_from(self.workflow).expect("Failed to build valid workflow from builder")
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(id: &str, task_type: &str) -> Self {
        Self {
            task: TaskConfig {
                id: id.to_string(),
                task_type: task_type.to_string(),
                after: vec![],
                before: None,
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn before(mut self, succ: &str) -> Self {
        self.task
            .before
            .get_or_insert_with(Vec::new)
            .push(succ.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
