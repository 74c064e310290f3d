//! Scenario execution
//!
//! Steps never abort a run: a protocol error or a wrong answer marks the
//! step as failed and the runner moves on, so one report shows every
//! discrepancy.

use crate::report::{Outcome, ScenarioReport};
use crate::scenario::{Scenario, Step};
use crate::HarnessConfig;
use tcam_model::{MatchResult, TcamModel};
use tcam_protocol::{CommandEncoder, Issuer, ModelIssuer};

/// Run `scenario` through `encoder`
pub fn run_scenario<I: Issuer>(
    encoder: &mut CommandEncoder<I>,
    scenario: &Scenario,
) -> ScenarioReport {
    tracing::info!(
        "Running scenario '{}' ({} steps, protocol {})",
        scenario.name,
        scenario.steps.len(),
        encoder.protocol()
    );

    let mut report = ScenarioReport::new(&scenario.name, encoder.protocol());
    for step in &scenario.steps {
        let (outcome, detail) = execute_step(encoder, step);
        if outcome == Outcome::Fail {
            tracing::warn!("Step '{}' failed: {}", step, detail);
        } else {
            tracing::debug!("Step '{}': {}", step, detail);
        }
        report.push(step.to_string(), outcome, detail);
    }

    tracing::info!(
        "Scenario '{}' finished: {} passed, {} failed",
        scenario.name,
        report.passed(),
        report.failed()
    );
    report
}

/// Run `scenario` against a fresh reference model
///
/// The report carries the final table digest and, if tracing is enabled in
/// `config`, the number of model operations executed.
pub fn run_against_model(scenario: &Scenario, config: &HarnessConfig) -> ScenarioReport {
    let model = if config.trace_capacity > 0 {
        TcamModel::with_trace(config.trace_capacity)
    } else {
        TcamModel::new()
    };
    let mut encoder =
        CommandEncoder::new(ModelIssuer::new(model, config.protocol), config.protocol);

    let mut report = run_scenario(&mut encoder, scenario);

    let model = encoder.issuer().model();
    report.attach_table(model.entries());
    report.model_ops = model.trace().map(|trace| trace.total_ops());
    report
}

fn execute_step<I: Issuer>(encoder: &mut CommandEncoder<I>, step: &Step) -> (Outcome, String) {
    match step {
        Step::Config { expect } => match encoder.read_config() {
            Ok(word) => match expect {
                Some(expected) if *expected != word => (
                    Outcome::Fail,
                    format!("config {:#010x}, expected {:#010x}", word, expected),
                ),
                _ => (Outcome::Pass, format!("config {:#010x}", word)),
            },
            Err(err) => (Outcome::Fail, err.to_string()),
        },
        Step::Write { address, data } => match encoder.write(*address, *data) {
            Ok(()) => (Outcome::Pass, "written".to_string()),
            Err(err) => (Outcome::Fail, err.to_string()),
        },
        Step::WriteAll { values } => match encoder.write_all(values.iter().copied()) {
            Ok(()) => (Outcome::Pass, format!("{} entries written", values.len())),
            Err(err) => (Outcome::Fail, err.to_string()),
        },
        Step::Search { query, expect } => match encoder.search(*query) {
            Ok(result) => check_match(result, expect.as_ref()),
            Err(err) => (Outcome::Fail, err.to_string()),
        },
        Step::RepeatSearch { query, count, expect } => {
            repeat_search(encoder, *query, *count, expect.as_ref())
        }
        Step::Status { expect } => match encoder.read_status() {
            Ok(result) => check_match(result, expect.as_ref()),
            Err(err) => (Outcome::Fail, err.to_string()),
        },
        Step::ExpectWriteError { address, data, error } => match encoder.write(*address, *data) {
            Ok(()) => (Outcome::Fail, format!("write accepted, expected {:?}", error)),
            Err(err) if error.matches(&err) => (Outcome::Pass, format!("rejected: {}", err)),
            Err(err) => (Outcome::Fail, format!("rejected with {}, expected {:?}", err, error)),
        },
    }
}

fn repeat_search<I: Issuer>(
    encoder: &mut CommandEncoder<I>,
    query: u32,
    count: u32,
    expect: Option<&MatchResult>,
) -> (Outcome, String) {
    let mut first: Option<MatchResult> = None;
    for iteration in 0..count {
        let result = match encoder.search(query) {
            Ok(result) => result,
            Err(err) => return (Outcome::Fail, format!("iteration {}: {}", iteration, err)),
        };
        match first {
            None => first = Some(result),
            Some(earlier) if earlier != result => {
                return (
                    Outcome::Fail,
                    format!("iteration {} gave {}, first gave {}", iteration, result, earlier),
                );
            }
            Some(_) => {}
        }
    }

    match first {
        Some(result) => {
            let (outcome, detail) = check_match(result, expect);
            (outcome, format!("{} (x{})", detail, count))
        }
        None => (Outcome::Pass, "no iterations".to_string()),
    }
}

fn check_match(result: MatchResult, expect: Option<&MatchResult>) -> (Outcome, String) {
    match expect {
        Some(expected) if *expected != result => {
            (Outcome::Fail, format!("{}, expected {}", result, expected))
        }
        _ => (Outcome::Pass, result.to_string()),
    }
}
