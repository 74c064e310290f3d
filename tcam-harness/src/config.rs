//! Harness configuration

use anyhow::Context;
use crate::Result;
use std::path::PathBuf;
use tcam_protocol::ProtocolVersion;

/// Settings for a harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Operand layout spoken by encoder and model
    pub protocol: ProtocolVersion,
    /// Repetitions of the repeated-search step in the regression scenario
    pub perf_iterations: u32,
    /// Scenario file to run instead of the built-in set
    pub scenario_path: Option<PathBuf>,
    /// Model operations kept in the trace (0 disables tracing)
    pub trace_capacity: usize,
    /// Where to write the JSON report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Create a new harness configuration
    pub fn new(protocol: ProtocolVersion, perf_iterations: u32) -> Self {
        Self {
            protocol,
            perf_iterations,
            ..Self::default()
        }
    }

    /// Read overrides from the process environment
    ///
    /// * `TCAM_PROTOCOL` - `nibble` or `split`
    /// * `TCAM_PERF_ITERATIONS` - repeated-search count
    /// * `TCAM_TRACE_CAPACITY` - model trace size
    /// * `TCAM_SCENARIO` - scenario JSON file
    /// * `TCAM_REPORT` - report output path
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(protocol) = lookup("TCAM_PROTOCOL") {
            config.protocol = protocol.parse().context("Invalid TCAM_PROTOCOL")?;
        }
        if let Some(iterations) = lookup("TCAM_PERF_ITERATIONS") {
            config.perf_iterations = iterations
                .trim()
                .parse()
                .with_context(|| format!("Invalid TCAM_PERF_ITERATIONS '{}'", iterations))?;
        }
        if let Some(capacity) = lookup("TCAM_TRACE_CAPACITY") {
            config.trace_capacity = capacity
                .trim()
                .parse()
                .with_context(|| format!("Invalid TCAM_TRACE_CAPACITY '{}'", capacity))?;
        }
        config.scenario_path = lookup("TCAM_SCENARIO").map(PathBuf::from);
        config.report_path = lookup("TCAM_REPORT").map(PathBuf::from);

        Ok(config)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolVersion::ControlNibble,
            perf_iterations: 1000,
            scenario_path: None,
            trace_capacity: 256,
            report_path: None,
        }
    }
}
