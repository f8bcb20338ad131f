// src/lib.rs

pub mod cli;
pub mod config;
pub mod cost;
pub mod dag;
pub mod errors;
pub mod fleet;
pub mod heft;
pub mod logging;
pub mod schedule;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::validate::task_type_histogram;
use crate::config::{ClusterConfig, builtin_cluster, load_cluster, load_workflow};
use crate::dag::{Dag, resilience_workflow};
use crate::schedule::report::{PlanDocument, exclusion_json, render_exclusions, render_table};
use crate::types::OutputFormat;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - cluster and workflow loading (or the built-ins)
/// - the optional cost feed
/// - the HEFT planning run
/// - rendering of the schedule / exclusion sets to `out`
pub fn run(args: CliArgs, out: &mut impl Write) -> Result<()> {
    let mut cluster = match args.cluster.as_ref() {
        Some(path) => load_cluster(path)
            .with_context(|| format!("loading cluster config {}", path.display()))?,
        None => builtin_cluster()?,
    };

    if let Some(path) = args.costs.as_ref() {
        // Feed problems are warnings; the report is already logged.
        let report = cluster.costs_mut().load_overrides(path);
        debug!(
            applied = report.applied.len(),
            warnings = report.warnings.len(),
            "cost feed processed"
        );
    }

    let dag = match args.workflow.as_ref() {
        Some(path) => load_workflow(path)
            .with_context(|| format!("loading workflow {}", path.display()))?,
        None => resilience_workflow(),
    };

    if args.dry_run {
        print_dry_run(&cluster, &dag, out)?;
        return Ok(());
    }

    info!(
        tasks = dag.len(),
        nodes = cluster.fleet().len(),
        "planning workflow with HEFT"
    );
    let schedule = heft::plan(cluster.fleet(), cluster.costs(), &dag)?;

    if let Some(task) = args.exclusion_for.as_deref() {
        match exclusion_json(&schedule, Some(task))? {
            Some(json) => writeln!(out, "{json}")?,
            None => bail!("task '{task}' is not part of the workflow"),
        }
        return Ok(());
    }

    if args.exclusions {
        if let Some(json) = exclusion_json(&schedule, None)? {
            writeln!(out, "{json}")?;
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => {
            render_table(&schedule, out)?;
            writeln!(out)?;
            render_exclusions(&schedule, out)?;
        }
        OutputFormat::Json => {
            let doc = PlanDocument::new(&schedule, cluster.fleet())?;
            writeln!(out, "{}", doc.to_json_pretty()?)?;
        }
    }

    Ok(())
}

/// Dry-run output: fleet, cost rows and tasks, without planning.
fn print_dry_run(cluster: &ClusterConfig, dag: &Dag, out: &mut impl Write) -> Result<()> {
    writeln!(out, "heftplan dry-run")?;
    writeln!(out)?;

    writeln!(out, "nodes ({}):", cluster.fleet().len())?;
    for node in cluster.fleet().nodes() {
        writeln!(
            out,
            "  - {} zone={} class={} capacity={}",
            node.id, node.zone, node.class, node.capacity
        )?;
    }
    writeln!(out)?;

    writeln!(out, "execution costs:")?;
    for task_type in cluster.costs().task_types() {
        let row: Vec<String> = cluster
            .costs()
            .class_costs(task_type)
            .iter()
            .map(|(class, cost)| format!("{class}={cost}"))
            .collect();
        writeln!(out, "  - {task_type}: {}", row.join(" "))?;
    }
    writeln!(out)?;

    writeln!(out, "tasks ({}):", dag.len())?;
    for decl in dag.decls() {
        writeln!(out, "  - {} ({})", decl.id, decl.task_type)?;
        if !decl.predecessors.is_empty() {
            writeln!(out, "      after: {:?}", decl.predecessors)?;
        }
        if !cluster.costs().has_task_type(&decl.task_type) {
            writeln!(out, "      note: no cost row; default costs apply")?;
        }
    }
    writeln!(out)?;

    writeln!(out, "task types:")?;
    for (task_type, count) in task_type_histogram(dag) {
        writeln!(out, "  - {task_type}: {count}")?;
    }

    debug!("dry-run complete (no planning)");
    Ok(())
}
