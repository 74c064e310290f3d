//! Scenario definitions
//!
//! A scenario is a named sequence of [`Step`]s. Steps that produce a result
//! may carry an expectation; steps without one only log what they observed.

use anyhow::Context;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tcam_model::{ConfigDescriptor, MatchResult, TcamError, ADDRESS_BITS, CAPACITY};

/// Data patterns of the RoCC regression program
pub const REGRESSION_DATA: [u32; 16] = [
    0x1234_5678, 0xABCD_EF00, 0xDEAD_BEEF, 0xCAFE_BABE,
    0x1111_1111, 0x2222_2222, 0x3333_3333, 0x4444_4444,
    0xFFFF_FFFF, 0x0000_0000, 0x55AA_55AA, 0xAA55_AA55,
    0x8765_4321, 0x1357_9BDF, 0x2468_ACE0, 0xFEDC_BA98,
];

/// Queries of the RoCC regression program
pub const REGRESSION_QUERIES: [u32; 8] = [
    0x1234_5678, 0xABCD_EF00, 0xDEAD_BEEF, 0xCAFE_BABE,
    0x9999_9999, 0x7777_7777, 0x0000_0000, 0xFFFF_FFFF,
];

/// `(address, data)` writes of the 64x28 bring-up program
const BRINGUP_WRITES: [(u32, u32); 8] = [
    (0x005, 0x10), (0x085, 0x00), (0x105, 0x10), (0x185, 0x00),
    (0x205, 0x10), (0x285, 0x00), (0x305, 0x10), (0x385, 0x00),
];

/// Named sequence of protocol steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

/// One protocol interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Read the configuration word
    Config {
        #[serde(default)]
        expect: Option<u32>,
    },
    /// Write one entry; must succeed
    Write { address: u32, data: u32 },
    /// Write `values[i]` at address `i`; must succeed
    WriteAll { values: Vec<u32> },
    /// Search once
    Search {
        query: u32,
        #[serde(default)]
        expect: Option<MatchResult>,
    },
    /// Search `count` times; every result must agree
    RepeatSearch {
        query: u32,
        count: u32,
        #[serde(default)]
        expect: Option<MatchResult>,
    },
    /// Read the last-match status
    Status {
        #[serde(default)]
        expect: Option<MatchResult>,
    },
    /// Write that must be rejected with the given error
    ExpectWriteError {
        address: u32,
        data: u32,
        error: ExpectedError,
    },
}

/// Error class a step expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    InvalidAddress,
    OutOfRange,
}

impl ExpectedError {
    pub fn matches(&self, err: &TcamError) -> bool {
        matches!(
            (self, err),
            (ExpectedError::InvalidAddress, TcamError::InvalidAddress { .. })
                | (ExpectedError::OutOfRange, TcamError::OutOfRange { .. })
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Config { .. } => write!(f, "config"),
            Step::Write { address, data } => write!(f, "write {:#010x} @ {}", data, address),
            Step::WriteAll { values } => write!(f, "write {} values from 0", values.len()),
            Step::Search { query, .. } => write!(f, "search {:#010x}", query),
            Step::RepeatSearch { query, count, .. } => {
                write!(f, "search {:#010x} x{}", query, count)
            }
            Step::Status { .. } => write!(f, "status"),
            Step::ExpectWriteError { address, data, error } => {
                write!(f, "write {:#010x} @ {} expecting {:?}", data, address, error)
            }
        }
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self { name: name.into(), steps }
    }

    /// Parse a scenario from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario JSON")
    }

    /// Load a scenario from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("In scenario file {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Two entries, one hit and one miss
    pub fn end_to_end() -> Self {
        Self::new(
            "end-to-end",
            vec![
                Step::Write { address: 0, data: 0x1234_5678 },
                Step::Write { address: 1, data: 0xABCD_EF00 },
                Step::Search { query: 0x1234_5678, expect: Some(MatchResult::hit(0)) },
                Step::Search { query: 0xDEAD_C0DE, expect: Some(MatchResult::no_match()) },
            ],
        )
    }

    /// Full regression: configuration, bulk write, queries, status,
    /// repeated search, edge cases and overwrite
    pub fn rocc_regression(perf_iterations: u32) -> Self {
        let mut steps = vec![
            Step::Config { expect: Some(ConfigDescriptor::standard().pack()) },
            Step::WriteAll { values: REGRESSION_DATA.to_vec() },
        ];

        for query in REGRESSION_QUERIES {
            let expect = REGRESSION_DATA
                .iter()
                .position(|&data| data == query)
                .map(|index| MatchResult::hit(index as u32))
                .unwrap_or_else(MatchResult::no_match);
            steps.push(Step::Search { query, expect: Some(expect) });
        }

        // Last query was 0xFFFFFFFF, stored at 8
        steps.push(Step::Status { expect: Some(MatchResult::hit(8)) });
        steps.push(Step::Status { expect: Some(MatchResult::hit(8)) });

        steps.push(Step::RepeatSearch {
            query: 0x1234_5678,
            count: perf_iterations,
            expect: Some(MatchResult::hit(0)),
        });

        steps.extend([
            Step::Write { address: CAPACITY - 1, data: 0xEDCE_CA5E },
            Step::Search { query: 0xEDCE_CA5E, expect: Some(MatchResult::hit(CAPACITY - 1)) },
            Step::Search { query: 0xDEAD_C0DE, expect: Some(MatchResult::no_match()) },
            Step::Write { address: 0, data: 0x12EE_DA7A },
            Step::Search { query: 0x12EE_DA7A, expect: Some(MatchResult::hit(0)) },
            Step::Search { query: 0x1234_5678, expect: Some(MatchResult::no_match()) },
            Step::ExpectWriteError {
                address: CAPACITY,
                data: 0xEDCE_CA5E,
                error: ExpectedError::OutOfRange,
            },
            Step::ExpectWriteError {
                address: 1 << ADDRESS_BITS,
                data: 0xEDCE_CA5E,
                error: ExpectedError::InvalidAddress,
            },
        ]);

        Self::new("rocc-regression", steps)
    }

    /// Replay of the 64x28 bring-up program
    ///
    /// Its address words are taken literally as table indices, so only the
    /// first write lands; the rest fall past the last entry. The query is not
    /// stored anywhere.
    pub fn rocc_64x28() -> Self {
        let (address, data) = BRINGUP_WRITES[0];
        let mut steps = vec![Step::Write { address, data }];
        for (address, data) in BRINGUP_WRITES.iter().skip(1).copied() {
            steps.push(Step::ExpectWriteError { address, data, error: ExpectedError::OutOfRange });
        }
        steps.extend([
            Step::Search { query: 0x00A1_4285, expect: Some(MatchResult::no_match()) },
            Step::Status { expect: Some(MatchResult::no_match()) },
        ]);

        Self::new("rocc-64x28", steps)
    }

    /// Scenarios run when no file is given
    pub fn builtin(perf_iterations: u32) -> Vec<Self> {
        vec![Self::end_to_end(), Self::rocc_regression(perf_iterations), Self::rocc_64x28()]
    }
}
