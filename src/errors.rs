// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeftError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in task DAG involving task '{task}'")]
    DagCycle { task: String },

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Task '{task}' was placed before its predecessor '{predecessor}' was scheduled")]
    UnscheduledPredecessor { task: String, predecessor: String },

    #[error("Scheduler is in phase {actual:?}, expected {expected:?}")]
    InvalidPhase {
        expected: crate::heft::SchedulerPhase,
        actual: crate::heft::SchedulerPhase,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeftError {
    /// Shorthand for building a [`HeftError::ConfigError`].
    pub fn config(msg: impl Into<String>) -> Self {
        HeftError::ConfigError(msg.into())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HeftError>;
