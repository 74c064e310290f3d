//! Scenario reports
//!
//! Reports record every step's outcome and, when run against the model, a
//! SHA-256 digest of the final entry table. Equal digests mean equal tables,
//! which makes runs on different backends easy to compare.

use anyhow::Context;
use crate::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tcam_model::Entry;
use tcam_protocol::ProtocolVersion;

/// Verdict of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
}

/// Result of one scenario step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Position of the step in its scenario
    pub index: usize,
    /// Human-readable step description
    pub step: String,
    pub outcome: Outcome,
    /// What was observed (and expected, on failure)
    pub detail: String,
}

/// Outcome of a full scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub protocol: ProtocolVersion,
    pub steps: Vec<StepOutcome>,
    /// Hex SHA-256 of the final entry table, when the backend exposes it
    pub table_digest: Option<String>,
    /// Number of valid entries at the end of the run
    pub valid_entries: Option<usize>,
    /// Model operations executed, when tracing was enabled
    pub model_ops: Option<u64>,
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>, protocol: ProtocolVersion) -> Self {
        Self {
            scenario: scenario.into(),
            protocol,
            steps: Vec::new(),
            table_digest: None,
            valid_entries: None,
            model_ops: None,
        }
    }

    pub fn push(&mut self, step: String, outcome: Outcome, detail: String) {
        let index = self.steps.len();
        self.steps.push(StepOutcome { index, step, outcome, detail });
    }

    /// Attach the digest and occupancy of the final entry table
    pub fn attach_table(&mut self, entries: &[Entry]) {
        self.table_digest = Some(table_digest(entries));
        self.valid_entries = Some(entries.iter().filter(|entry| entry.valid).count());
    }

    pub fn passed(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome == Outcome::Pass).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome == Outcome::Fail).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Failing steps only
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.outcome == Outcome::Fail)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario report")
    }

    /// Write a set of reports as one JSON array
    pub fn save_all(reports: &[ScenarioReport], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}

/// SHA-256 over the entry table, hex encoded
///
/// Each entry contributes its index (u32 LE), its valid flag (one byte) and
/// its key (u32 LE). Keys of invalid entries are hashed as zero so stale
/// contents never affect the digest.
pub fn table_digest(entries: &[Entry]) -> String {
    let mut hasher = Sha256::new();
    for (index, entry) in entries.iter().enumerate() {
        let key = if entry.valid { entry.key } else { 0 };
        hasher.update((index as u32).to_le_bytes());
        hasher.update([u8::from(entry.valid)]);
        hasher.update(key.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
