// src/config/mod.rs

//! Configuration loading and validation for heftplan.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load cluster and workflow files from disk (`loader.rs`).
//! - Turn raw files into validated values (`validate.rs`).
//! - Provide the built-in cluster used when no file is given (`builtin.rs`).

pub mod builtin;
pub mod loader;
pub mod model;
pub mod validate;

pub use builtin::builtin_cluster;
pub use loader::{load_cluster, load_cluster_raw, load_workflow, load_workflow_raw};
pub use model::{
    ClusterConfig, CommCostConfig, DefaultsSection, NodeConfig, RawClusterFile, RawWorkflowFile,
    TaskConfig,
};
