//! Diagnostic driver for the TCAM protocol
//!
//! Runs the built-in scenarios (or the scenario file given as the first
//! argument or in `TCAM_SCENARIO`) against the reference model and prints
//! every step. Exits with an error if any step fails.
//!
//! Logging is controlled through `RUST_LOG` (default `info`).

use anyhow::{bail, Result};
use tcam_harness::{run_against_model, HarnessConfig, Outcome, Scenario, ScenarioReport};
use tcam_model::ConfigDescriptor;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = HarnessConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        config.scenario_path = Some(path.into());
    }

    let scenarios = match &config.scenario_path {
        Some(path) => vec![Scenario::load(path)?],
        None => Scenario::builtin(config.perf_iterations),
    };

    let descriptor = ConfigDescriptor::standard();
    println!("=== TCAM RoCC Diagnostics ===");
    println!(
        "protocol: {}  capacity: {}  key width: {} bits",
        config.protocol, descriptor.capacity, descriptor.key_width
    );

    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let report = run_against_model(scenario, &config);
        print_report(&report);
        reports.push(report);
    }

    if let Some(path) = &config.report_path {
        ScenarioReport::save_all(&reports, path)?;
        tracing::info!("Report written to {}", path.display());
    }

    let failed: usize = reports.iter().map(ScenarioReport::failed).sum();
    if failed > 0 {
        bail!("{} step(s) failed", failed);
    }
    println!("\n=== All scenarios passed ===");
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    println!("\n--- {} ---", report.scenario);
    for step in &report.steps {
        let mark = match step.outcome {
            Outcome::Pass => "ok  ",
            Outcome::Fail => "FAIL",
        };
        println!("[{}] {:>3} {:<40} {}", mark, step.index, step.step, step.detail);
    }
    println!("passed: {}  failed: {}", report.passed(), report.failed());
    if let (Some(digest), Some(valid)) = (&report.table_digest, report.valid_entries) {
        println!("table: {} valid entries, sha256 {}", valid, digest);
    }
}
