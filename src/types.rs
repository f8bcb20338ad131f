use std::str::FromStr;

/// Identifier of a task inside a workflow.
pub type TaskId = String;

/// Identifier of a node in the fleet.
pub type NodeId = String;

/// Identifier of a zone (a group of co-located nodes).
pub type ZoneId = String;

/// Task type, selecting a row of the execution-cost table.
pub type TaskType = String;

/// How the CLI renders a finished plan.
///
/// - `Table`: fixed-width table sorted by start time, plus makespan.
/// - `Json`: the full plan document (schedule, makespan, exclusions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "invalid output format: {other} (expected \"table\" or \"json\")"
            )),
        }
    }
}
