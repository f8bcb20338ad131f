// tests/integration/cost_feed.rs

use heftplan::config::builtin_cluster;
use heftplan::cost::feed::CostFeedWarning;
use heftplan::dag::resilience_workflow;
use heftplan::heft;

use crate::common::{assert_close, init_tracing, write_temp};

const FEED: &str = r#"
{
  "platforms": {
    "github_actions": {
      "step_statistics": {
        "HEALTH_CHECK_1": { "mean": 21.4, "median": 20.9 },
        "INTERIM_HEALTH_CHECK_1": { "mean": 18.0 },
        "rack-simulation": { "mean": 300.0, "master_mean": 320.0 },
        "NODE_SIMULATION": { "mean": -4.0 },
        "DEPLOY": { "mean": 7.0 }
      }
    },
    "local": {
      "step_statistics": {
        "HEALTH_CHECK_2": { "mean": 22.0 }
      }
    },
    "broken": { "summary": {} }
  }
}
"#;

#[test]
fn feed_overrides_known_rows_and_reports_the_rest() {
    init_tracing();
    let mut cluster = builtin_cluster().unwrap();
    let feed = write_temp(FEED);

    let report = cluster.costs_mut().load_overrides(feed.path());

    let costs = cluster.costs();
    let row = costs.class_costs("HEALTH_CHECK");
    // "local" sorts after "github_actions", so its HEALTH_CHECK_2 wins.
    assert_close(row["worker"], 22.0, "health check worker");
    assert_close(row["master"], 22.0 * 1.2, "health check master");

    let interim = costs.class_costs("INTERIM_HEALTH_CHECK");
    assert_close(interim["worker"], 18.0, "interim worker");
    // The final check keeps its own row.
    assert_close(costs.class_costs("FINAL_HEALTH_CHECK")["worker"], 20.0, "final worker");

    let rack = costs.class_costs("RACK_SIMULATION");
    assert_close(rack["worker"], 300.0, "rack worker");
    assert_close(rack["master"], 320.0, "rack master");

    // Rejected mean leaves the built-in value.
    assert_close(costs.class_costs("NODE_SIMULATION")["worker"], 150.0, "node worker");
    assert!(!costs.has_task_type("DEPLOY"));

    assert_eq!(report.applied.len(), 4);
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        CostFeedWarning::InvalidStep { step, .. } if step == "NODE_SIMULATION"
    )));
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        CostFeedWarning::UnrecognizedTaskType { task_type, .. } if task_type == "DEPLOY"
    )));
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        CostFeedWarning::InvalidPlatform { platform } if platform == "broken"
    )));
}

#[test]
fn overridden_costs_change_the_plan() {
    let mut cluster = builtin_cluster().unwrap();
    let feed = write_temp(FEED);
    cluster.costs_mut().load_overrides(feed.path());

    let schedule = heft::plan(cluster.fleet(), cluster.costs(), &resilience_workflow()).unwrap();
    let rack = schedule.get("rack-simulation").unwrap();
    assert_close(rack.duration(), 300.0, "rack duration");
}

#[test]
fn unreadable_feed_keeps_default_costs() {
    let mut cluster = builtin_cluster().unwrap();
    let report = cluster
        .costs_mut()
        .load_overrides("/definitely/not/here/feed.json");

    assert!(report.applied.is_empty());
    assert!(matches!(
        report.warnings.as_slice(),
        [CostFeedWarning::Unreadable { .. }]
    ));
    assert_close(
        cluster.costs().class_costs("HEALTH_CHECK")["worker"],
        25.0,
        "health check worker",
    );
}

#[test]
fn malformed_feed_is_a_single_warning() {
    let mut cluster = builtin_cluster().unwrap();
    let feed = write_temp("{ not json");
    let report = cluster.costs_mut().load_overrides(feed.path());
    assert!(matches!(
        report.warnings.as_slice(),
        [CostFeedWarning::Malformed(_)]
    ));
}

#[test]
fn feed_without_platforms_is_a_single_warning() {
    let mut cluster = builtin_cluster().unwrap();
    let feed = write_temp(r#"{ "generated": "yesterday" }"#);
    let report = cluster.costs_mut().load_overrides(feed.path());
    assert_eq!(report.warnings, vec![CostFeedWarning::MissingPlatforms]);
}
