//! Function codes and protocol versions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tcam_model::CommandKind;
use thiserror::Error;

/// Function code of the custom instruction
///
/// The code is a pure function of the two active-low control signals:
/// `funct = (chip_select << 1) | write_enable`.
///
/// | write_enable | chip_select | funct | operation |
/// |--------------|-------------|-------|-----------|
/// | 0            | 0           | 0     | WRITE     |
/// | 1            | 0           | 1     | SEARCH    |
/// | 0            | 1           | 2     | STATUS    |
/// | 1            | 1           | 3     | CONFIG    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FunctionCode {
    Write = 0,
    Search = 1,
    Status = 2,
    Config = 3,
}

impl FunctionCode {
    pub const ALL: [FunctionCode; 4] = [
        FunctionCode::Write,
        FunctionCode::Search,
        FunctionCode::Status,
        FunctionCode::Config,
    ];

    /// Map a control-signal pair to its function code.
    /// Total over the 2x2 space.
    pub const fn from_signals(write_enable: bool, chip_select: bool) -> Self {
        match (write_enable, chip_select) {
            (false, false) => FunctionCode::Write,
            (true, false) => FunctionCode::Search,
            (false, true) => FunctionCode::Status,
            (true, true) => FunctionCode::Config,
        }
    }

    /// Control signals `(write_enable, chip_select)` selecting this code
    pub const fn signals(self) -> (bool, bool) {
        let bits = self as u8;
        (bits & 0b01 != 0, bits & 0b10 != 0)
    }

    /// Decode the low two bits of a raw function field
    pub const fn from_bits(bits: u8) -> Self {
        Self::from_signals(bits & 0b01 != 0, bits & 0b10 != 0)
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn kind(self) -> CommandKind {
        match self {
            FunctionCode::Write => CommandKind::Write,
            FunctionCode::Search => CommandKind::Search,
            FunctionCode::Status => CommandKind::Status,
            FunctionCode::Config => CommandKind::Config,
        }
    }
}

impl From<CommandKind> for FunctionCode {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Write => FunctionCode::Write,
            CommandKind::Search => FunctionCode::Search,
            CommandKind::Status => FunctionCode::Status,
            CommandKind::Config => FunctionCode::Config,
        }
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.bits())
    }
}

/// Operand layout spoken by the accelerator
///
/// Two incompatible layouts exist for the same function codes. Encoder and
/// accelerator (or model) must agree on one; they are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// `rs1 = nibble << 28 | address`, `rs2 = data`.
    /// SEARCH carries its query in `rs2`.
    #[default]
    ControlNibble,
    /// No control nibble. WRITE has `rs1 = data, rs2 = address`;
    /// SEARCH has `rs1 = query`.
    SplitFunct,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::ControlNibble => f.write_str("nibble"),
            ProtocolVersion::SplitFunct => f.write_str("split"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown protocol version '{0}' (expected 'nibble' or 'split')")]
pub struct ParseProtocolError(pub String);

impl FromStr for ProtocolVersion {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nibble" | "control-nibble" | "controlnibble" => Ok(ProtocolVersion::ControlNibble),
            "split" | "split-funct" | "splitfunct" => Ok(ProtocolVersion::SplitFunct),
            _ => Err(ParseProtocolError(s.to_string())),
        }
    }
}
