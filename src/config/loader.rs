// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ClusterConfig, RawClusterFile, RawWorkflowFile};
use crate::dag::Dag;
use crate::errors::Result;

/// Read a cluster file without semantic validation.
pub fn load_cluster_raw(path: impl AsRef<Path>) -> Result<RawClusterFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawClusterFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Read and validate a cluster file.
///
/// Checks that the fleet is non-empty with unique ids and usable
/// capacities, that every cost is a usable number, and that the tables
/// price every node class and zone of the fleet.
pub fn load_cluster(path: impl AsRef<Path>) -> Result<ClusterConfig> {
    let path = path.as_ref();
    let cluster = ClusterConfig::try_from(load_cluster_raw(path)?)?;
    debug!(
        path = %path.display(),
        nodes = cluster.fleet().len(),
        "cluster config loaded"
    );
    Ok(cluster)
}

/// Read a workflow file without semantic validation.
pub fn load_workflow_raw(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawWorkflowFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Read a workflow file and validate its DAG (references, edge
/// consistency, acyclicity).
pub fn load_workflow(path: impl AsRef<Path>) -> Result<Dag> {
    let path = path.as_ref();
    let dag = Dag::try_from(load_workflow_raw(path)?)?;
    debug!(path = %path.display(), tasks = dag.len(), "workflow loaded");
    Ok(dag)
}
