#[path = "../common/mod.rs"]
mod common;

mod cli_run;
mod cost_feed;
