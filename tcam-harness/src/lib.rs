//! TCAM Harness - Scenario runner for the TCAM command protocol
//!
//! This crate drives a [`CommandEncoder`](tcam_protocol::CommandEncoder) with
//! write/search sequences, checks decoded results against expectations, and
//! produces reports that can be compared across runs.
//!
//! Scenarios are plain data: they can be built in code, taken from the
//! built-in set, or loaded from JSON files.

pub mod config;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::HarnessConfig;
pub use report::{table_digest, Outcome, ScenarioReport, StepOutcome};
pub use runner::{run_against_model, run_scenario};
pub use scenario::{ExpectedError, Scenario, Step};

/// Result type for harness operations
pub type Result<T> = anyhow::Result<T>;
