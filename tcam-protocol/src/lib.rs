//! TCAM Protocol - Command encoding and status decoding for the TCAM accelerator
//!
//! The accelerator sits behind a RoCC-style custom instruction: one opcode,
//! a 2-bit function code, two source registers and one result register. This
//! crate owns everything about how those registers are filled and read back.
//!
//! # Overview
//!
//! * [`FunctionCode`] - the four function codes, derived from the
//!   write-enable / chip-select pair
//! * [`packing`] - bit layouts of the operand registers
//! * [`Issuer`] - the instruction-issue primitive, injected so hardware and
//!   the reference model are interchangeable
//! * [`CommandEncoder`] - WRITE, SEARCH, STATUS and CONFIG on top of an issuer
//! * [`decode`] - result word to [`MatchResult`]
//! * [`ModelIssuer`] - an issuer backed by [`tcam_model::TcamModel`]
//!
//! # Usage
//!
//! ```
//! use tcam_model::TcamModel;
//! use tcam_protocol::{CommandEncoder, ModelIssuer, ProtocolVersion};
//!
//! let protocol = ProtocolVersion::ControlNibble;
//! let mut tcam = CommandEncoder::new(ModelIssuer::new(TcamModel::new(), protocol), protocol);
//! tcam.write(0, 0x1234_5678).unwrap();
//! tcam.write(1, 0xABCD_EF00).unwrap();
//!
//! let hit = tcam.search(0x1234_5678).unwrap();
//! assert!(hit.found && hit.index == 0);
//! assert_eq!(tcam.read_status().unwrap(), hit);
//! ```

pub mod decoder;
pub mod encoder;
pub mod funct;
pub mod issuer;
pub mod model_issuer;
pub mod packing;

pub use decoder::{decode, decode_register};
pub use encoder::{Command, CommandEncoder};
pub use funct::{FunctionCode, ParseProtocolError, ProtocolVersion};
pub use issuer::Issuer;
pub use model_issuer::{ModelIssuer, SharedIssuer};
pub use packing::{ControlNibble, WriteMask, WriteOperands};

pub use tcam_model::{MatchResult, TcamError};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, TcamError>;
