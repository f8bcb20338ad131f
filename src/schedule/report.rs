// src/schedule/report.rs

//! Human-readable and JSON renderings of a finished plan.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::errors::Result;
use crate::fleet::Fleet;
use crate::schedule::{Assignment, ExclusionSummary, FailureTargets, NodeUtilization, Schedule, TaskExclusion};

const RULE_WIDTH: usize = 78;

/// Fixed-width table of the timeline followed by the makespan.
pub fn render_table(schedule: &Schedule, out: &mut impl Write) -> io::Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    writeln!(out, "{heavy}")?;
    writeln!(out, "HEFT SCHEDULE")?;
    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "{:<25} {:<20} {:>10} {:>10} {:>10}",
        "Task", "Node (zone)", "Start", "End", "Rank"
    )?;
    writeln!(out, "{light}")?;

    for a in schedule.timeline() {
        let placed = format!("{} ({})", a.node, a.zone);
        writeln!(
            out,
            "{:<25} {:<20} {:>10.1} {:>10.1} {:>10.1}",
            a.task, placed, a.start, a.end, a.rank
        )?;
    }

    writeln!(out, "{light}")?;
    writeln!(out, "Makespan: {:.1}s", schedule.makespan())?;
    writeln!(out, "{heavy}")?;
    Ok(())
}

/// Exclusion summary followed by the per-task placements, sorted by task.
pub fn render_exclusions(schedule: &Schedule, out: &mut impl Write) -> io::Result<()> {
    let summary = schedule.exclusion_summary();

    writeln!(out, "Exclusion info for failure simulation:")?;
    writeln!(out, "  Exclude nodes: {}", join(&summary.exclude_nodes))?;
    writeln!(out, "  Exclude zones: {}", join(&summary.exclude_zones))?;
    writeln!(out)?;
    writeln!(out, "Per-task execution nodes:")?;

    let mut tasks: Vec<&Assignment> = schedule.assignments().iter().collect();
    tasks.sort_by(|a, b| a.task.cmp(&b.task));
    for a in tasks {
        writeln!(out, "  {}: run on {} (zone {})", a.task, a.node, a.zone)?;
    }
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let parts: Vec<&str> = items.into_iter().map(|s| s.as_str()).collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// Everything a downstream consumer needs, as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDocument<'a> {
    pub makespan: f64,
    pub timeline: Vec<&'a Assignment>,
    pub exclusions: ExclusionSummary,
    pub per_task: BTreeMap<&'a str, TaskExclusion>,
    pub failure_targets: FailureTargets,
    pub utilization: Vec<NodeUtilization>,
}

impl<'a> PlanDocument<'a> {
    pub fn new(schedule: &'a Schedule, fleet: &Fleet) -> Result<Self> {
        let per_task = schedule
            .assignments()
            .iter()
            .map(|a| {
                (
                    a.task.as_str(),
                    TaskExclusion {
                        exclude_node: a.node.clone(),
                        exclude_zone: a.zone.clone(),
                    },
                )
            })
            .collect();

        Ok(Self {
            makespan: schedule.makespan(),
            timeline: schedule.timeline(),
            exclusions: schedule.exclusion_summary(),
            per_task,
            failure_targets: schedule.failure_targets(fleet)?,
            utilization: schedule.node_utilization(fleet)?,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?)
    }
}

/// JSON for a single task's exclusion, or the whole-schedule summary when
/// `task` is `None`. Unknown tasks yield `None`.
pub fn exclusion_json(schedule: &Schedule, task: Option<&str>) -> Result<Option<String>> {
    let json = match task {
        Some(id) => match schedule.exclusion_for(id) {
            Some(ex) => serde_json::to_string_pretty(&ex),
            None => return Ok(None),
        },
        None => serde_json::to_string_pretty(&schedule.exclusion_summary()),
    };
    Ok(Some(json.map_err(anyhow::Error::from)?))
}
