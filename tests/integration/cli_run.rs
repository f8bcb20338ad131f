// tests/integration/cli_run.rs

use clap::Parser;
use heftplan::cli::CliArgs;
use serde_json::Value;

use crate::common::write_temp;

fn run_with(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["heftplan"];
    argv.extend_from_slice(args);
    let args = CliArgs::try_parse_from(argv)?;

    let mut out = Vec::new();
    heftplan::run(args, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn table_output_lists_tasks_makespan_and_exclusions() {
    let out = run_with(&[]).unwrap();
    assert!(out.contains("HEFT SCHEDULE"));
    assert!(out.contains("Makespan: 578.9s"));
    assert!(out.contains("rack-simulation"));
    assert!(out.contains("Exclude nodes: worker-w001, worker-w002, worker-w003"));
    assert!(out.contains("Exclude zones: R1, R2"));
    assert!(out.contains("final-health-check: run on worker-w003 (zone R2)"));
}

#[test]
fn json_output_is_a_complete_plan_document() {
    let out = run_with(&["--format", "json"]).unwrap();
    let doc: Value = serde_json::from_str(&out).unwrap();

    assert!((doc["makespan"].as_f64().unwrap() - 578.9).abs() < 1e-6);
    assert_eq!(doc["timeline"].as_array().unwrap().len(), 8);
    assert_eq!(doc["timeline"][0]["task"], "initialize");
    assert_eq!(doc["per_task"]["health-check-2"]["exclude_node"], "worker-w002");
    assert_eq!(
        doc["failure_targets"]["eligible_nodes"],
        serde_json::json!(["worker-w004", "worker-w005", "worker-w006"])
    );
    assert_eq!(doc["failure_targets"]["eligible_zones"][0], "R3");
    assert_eq!(doc["utilization"].as_array().unwrap().len(), 9);
}

#[test]
fn exclusions_flag_prints_only_the_summary() {
    let out = run_with(&["--exclusions"]).unwrap();
    let doc: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        doc["exclude_nodes"],
        serde_json::json!(["worker-w001", "worker-w002", "worker-w003"])
    );
    assert_eq!(doc["exclude_zones"], serde_json::json!(["R1", "R2"]));
}

#[test]
fn exclusion_for_a_single_task() {
    let out = run_with(&["--exclusion-for", "health-check-3"]).unwrap();
    let doc: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["exclude_node"], "worker-w003");
    assert_eq!(doc["exclude_zone"], "R2");
}

#[test]
fn exclusion_for_an_unknown_task_is_an_error() {
    let err = run_with(&["--exclusion-for", "no-such-task"]).unwrap_err();
    assert!(err.to_string().contains("no-such-task"));
}

#[test]
fn dry_run_lists_inputs_without_planning() {
    let workflow = write_temp(
        r#"
[[task]]
id = "initialize"
type = "INITIALIZE"

[[task]]
id = "deploy"
type = "DEPLOY"
after = ["initialize"]
"#,
    );
    let path = workflow.path().to_str().unwrap();
    let out = run_with(&["--workflow", path, "--dry-run"]).unwrap();

    assert!(out.starts_with("heftplan dry-run"));
    assert!(out.contains("nodes (9):"));
    assert!(out.contains("master-m001 zone=R1 class=master capacity=0.8"));
    assert!(out.contains("deploy (DEPLOY)"));
    assert!(out.contains("note: no cost row; default costs apply"));
    assert!(!out.contains("HEFT SCHEDULE"));
}

#[test]
fn broken_workflow_file_fails_the_run() {
    let workflow = write_temp(
        r#"
[[task]]
id = "a"
type = "INITIALIZE"
after = ["a"]
"#,
    );
    let path = workflow.path().to_str().unwrap();
    let err = run_with(&["--workflow", path]).unwrap_err();
    assert!(format!("{err:#}").contains("own predecessor"));
}
