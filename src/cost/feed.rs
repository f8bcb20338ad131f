// src/cost/feed.rs

//! Historical-cost feed produced by the benchmark aggregation tooling.
//!
//! ```json
//! {
//!   "platforms": {
//!     "github_actions": {
//!       "step_statistics": {
//!         "HEALTH_CHECK_1": { "mean": 21.4, "median": 20.9 },
//!         "RACK_SIMULATION": { "mean": 331.0, "master_mean": 402.5 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Nothing in here fails hard: every problem is turned into a
//! [`CostFeedWarning`] and the offending entry is skipped.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::cost::normalize::task_type_for_step;
use crate::types::TaskType;

/// Recoverable problem found while reading a cost feed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostFeedWarning {
    #[error("could not read cost feed '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("cost feed is not valid JSON: {0}")]
    Malformed(String),

    #[error("cost feed has no \"platforms\" object")]
    MissingPlatforms,

    #[error("platform '{platform}' has no \"step_statistics\" object")]
    InvalidPlatform { platform: String },

    #[error("step '{step}' on platform '{platform}' ignored: {reason}")]
    InvalidStep {
        platform: String,
        step: String,
        reason: String,
    },

    #[error("step '{step}' maps to task type '{task_type}' which has no cost entry")]
    UnrecognizedTaskType { step: String, task_type: TaskType },
}

/// One usable `mean` (and optional `master_mean`) read from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct StepObservation {
    pub platform: String,
    pub step: String,
    pub task_type: TaskType,
    pub mean: f64,
    pub master_mean: Option<f64>,
}

/// A parsed cost feed document.
#[derive(Debug, Clone)]
pub struct CostFeed {
    root: Value,
}

impl CostFeed {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn parse(contents: &str) -> Result<Self, CostFeedWarning> {
        serde_json::from_str(contents)
            .map(Self::from_value)
            .map_err(|e| CostFeedWarning::Malformed(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CostFeedWarning> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| CostFeedWarning::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&contents)
    }

    /// Every usable step observation, platforms and steps in key order.
    ///
    /// Entries that cannot be used are reported through `warnings`.
    pub fn observations(&self, warnings: &mut Vec<CostFeedWarning>) -> Vec<StepObservation> {
        let Some(platforms) = self.root.get("platforms").and_then(Value::as_object) else {
            warnings.push(CostFeedWarning::MissingPlatforms);
            return Vec::new();
        };

        let mut platform_names: Vec<&String> = platforms.keys().collect();
        platform_names.sort();

        let mut out = Vec::new();
        for platform in platform_names {
            let Some(steps) = platforms[platform]
                .get("step_statistics")
                .and_then(Value::as_object)
            else {
                warnings.push(CostFeedWarning::InvalidPlatform {
                    platform: platform.clone(),
                });
                continue;
            };

            let mut step_names: Vec<&String> = steps.keys().collect();
            step_names.sort();

            for step in step_names {
                let stats = &steps[step];
                match read_positive(stats, "mean") {
                    Ok(mean) => {
                        let master_mean = match stats.get("master_mean") {
                            None | Some(Value::Null) => None,
                            Some(_) => match read_positive(stats, "master_mean") {
                                Ok(v) => Some(v),
                                Err(reason) => {
                                    warnings.push(CostFeedWarning::InvalidStep {
                                        platform: platform.clone(),
                                        step: step.clone(),
                                        reason,
                                    });
                                    None
                                }
                            },
                        };
                        out.push(StepObservation {
                            platform: platform.clone(),
                            step: step.clone(),
                            task_type: task_type_for_step(step),
                            mean,
                            master_mean,
                        });
                    }
                    Err(reason) => warnings.push(CostFeedWarning::InvalidStep {
                        platform: platform.clone(),
                        step: step.clone(),
                        reason,
                    }),
                }
            }
        }

        out
    }
}

fn read_positive(stats: &Value, field: &str) -> Result<f64, String> {
    let value = stats
        .get(field)
        .ok_or_else(|| format!("missing \"{field}\""))?;
    let number = value
        .as_f64()
        .ok_or_else(|| format!("\"{field}\" is not a number"))?;
    if !number.is_finite() || number <= 0.0 {
        return Err(format!("\"{field}\" must be > 0 (got {number})"));
    }
    Ok(number)
}
