//! Command encoder
//!
//! Builds operand registers for WRITE, SEARCH, STATUS and CONFIG and sends
//! them through an [`Issuer`].

use crate::decoder::decode_register;
use crate::packing::{check_address, WriteOperands};
use crate::{FunctionCode, Issuer, ProtocolVersion, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tcam_model::{CommandKind, MatchResult};

/// One operation as handed to the issuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub address: u32,
    pub data: u32,
    /// Active-low write enable
    pub write_enable: bool,
    /// Active-low chip select
    pub chip_select: bool,
}

impl Command {
    pub fn new(kind: CommandKind, address: u32, data: u32) -> Self {
        let (write_enable, chip_select) = FunctionCode::from(kind).signals();
        Self { kind, address, data, write_enable, chip_select }
    }

    pub fn funct(&self) -> FunctionCode {
        FunctionCode::from_signals(self.write_enable, self.chip_select)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} addr={:#09x} data={:#010x} we={} cs={}",
            self.kind,
            self.address,
            self.data,
            u8::from(self.write_enable),
            u8::from(self.chip_select)
        )
    }
}

/// High-level TCAM command surface over an [`Issuer`]
///
/// The encoder is synchronous: every call blocks until the issuer returns.
#[derive(Debug)]
pub struct CommandEncoder<I> {
    issuer: I,
    protocol: ProtocolVersion,
    last_command: Option<Command>,
}

impl<I: Issuer> CommandEncoder<I> {
    pub fn new(issuer: I, protocol: ProtocolVersion) -> Self {
        Self { issuer, protocol, last_command: None }
    }

    /// WRITE `data` into entry `address`.
    ///
    /// Addresses that do not fit the 28-bit field are rejected with
    /// [`TcamError::InvalidAddress`](crate::TcamError::InvalidAddress) before
    /// anything is issued. Errors reported by the issuer are returned as is.
    pub fn write(&mut self, address: u32, data: u32) -> Result<()> {
        check_address(address)?;

        let command = Command::new(CommandKind::Write, address, data);
        let (rs1, rs2) = match self.protocol {
            ProtocolVersion::ControlNibble => {
                WriteOperands::new(FunctionCode::Write, address, data).encode()?
            }
            ProtocolVersion::SplitFunct => (u64::from(data), u64::from(address)),
        };

        self.dispatch(command, rs1, rs2)?;
        Ok(())
    }

    /// SEARCH for `query` and decode the matched index
    pub fn search(&mut self, query: u32) -> Result<MatchResult> {
        let command = Command::new(CommandKind::Search, 0, query);
        let (rs1, rs2) = match self.protocol {
            ProtocolVersion::ControlNibble => {
                WriteOperands::new(FunctionCode::Search, 0, query).encode()?
            }
            ProtocolVersion::SplitFunct => (u64::from(query), 0),
        };

        let rd = self.dispatch(command, rs1, rs2)?;
        Ok(decode_register(rd))
    }

    /// STATUS: outcome of the accelerator's most recent SEARCH
    pub fn read_status(&mut self) -> Result<MatchResult> {
        let rd = self.dispatch(Command::new(CommandKind::Status, 0, 0), 0, 0)?;
        Ok(decode_register(rd))
    }

    /// CONFIG: raw configuration word, passed through untouched
    pub fn read_config(&mut self) -> Result<u32> {
        let rd = self.dispatch(Command::new(CommandKind::Config, 0, 0), 0, 0)?;
        Ok(rd as u32)
    }

    /// Write `values[i]` at address `i`, stopping at the first failure
    pub fn write_all<V>(&mut self, values: V) -> Result<()>
    where
        V: IntoIterator<Item = u32>,
    {
        for (address, data) in (0u32..).zip(values) {
            self.write(address, data)?;
        }
        Ok(())
    }

    /// Most recently issued command, for diagnostics
    pub fn last_command(&self) -> Option<&Command> {
        self.last_command.as_ref()
    }

    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    pub fn issuer_mut(&mut self) -> &mut I {
        &mut self.issuer
    }

    pub fn into_inner(self) -> I {
        self.issuer
    }

    fn dispatch(&mut self, command: Command, rs1: u64, rs2: u64) -> Result<u64> {
        let funct = command.funct();
        tracing::debug!("Issuing {} (rs1={:#010x}, rs2={:#010x})", command, rs1, rs2);
        self.last_command = Some(command);
        self.issuer.issue(funct, rs1, rs2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TcamError;
    use tcam_model::{CAPACITY, NO_MATCH};

    /// Records every instruction and replies with a fixed word
    #[derive(Debug, Default)]
    struct ScriptedIssuer {
        issued: Vec<(FunctionCode, u64, u64)>,
        reply: u64,
    }

    impl Issuer for ScriptedIssuer {
        fn issue(&mut self, funct: FunctionCode, rs1: u64, rs2: u64) -> Result<u64> {
            self.issued.push((funct, rs1, rs2));
            Ok(self.reply)
        }
    }

    fn nibble_encoder() -> CommandEncoder<ScriptedIssuer> {
        CommandEncoder::new(ScriptedIssuer::default(), ProtocolVersion::ControlNibble)
    }

    #[test]
    fn test_write_packs_control_nibble() {
        let mut tcam = nibble_encoder();
        tcam.write(7, 0xDEAD_BEEF).unwrap();

        assert_eq!(
            tcam.issuer().issued,
            vec![(FunctionCode::Write, 0xC000_0007, 0xDEAD_BEEF)]
        );
    }

    #[test]
    fn test_search_uses_query_mode() {
        let mut tcam = nibble_encoder();
        tcam.issuer_mut().reply = 3;

        let result = tcam.search(0xCAFE_BABE).unwrap();
        assert_eq!(result, MatchResult::hit(3));
        assert_eq!(
            tcam.issuer().issued,
            vec![(FunctionCode::Search, 0xD000_0000, 0xCAFE_BABE)]
        );
    }

    #[test]
    fn test_split_funct_layout() {
        let mut tcam =
            CommandEncoder::new(ScriptedIssuer::default(), ProtocolVersion::SplitFunct);
        tcam.write(2, 0x2222_2222).unwrap();
        tcam.search(0x3333_3333).unwrap();

        assert_eq!(
            tcam.issuer().issued,
            vec![
                (FunctionCode::Write, 0x2222_2222, 2),
                (FunctionCode::Search, 0x3333_3333, 0),
            ]
        );
    }

    #[test]
    fn test_status_and_config_carry_no_operands() {
        let mut tcam = nibble_encoder();
        tcam.issuer_mut().reply = u64::from(NO_MATCH);

        assert_eq!(tcam.read_status().unwrap(), MatchResult::no_match());
        assert_eq!(tcam.read_config().unwrap(), NO_MATCH);
        assert_eq!(
            tcam.issuer().issued,
            vec![(FunctionCode::Status, 0, 0), (FunctionCode::Config, 0, 0)]
        );
    }

    #[test]
    fn test_config_is_pass_through() {
        let mut tcam = nibble_encoder();
        tcam.issuer_mut().reply = 0xFFFF_FFFF_1234_5678;
        assert_eq!(tcam.read_config().unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_invalid_address_is_rejected_before_issue() {
        let mut tcam = nibble_encoder();
        let err = tcam.write(1 << 28, 1).unwrap_err();

        assert_eq!(err, TcamError::InvalidAddress { address: 1 << 28, bits: 28 });
        assert!(tcam.issuer().issued.is_empty(), "nothing may be issued");
        assert!(tcam.last_command().is_none());
    }

    #[test]
    fn test_address_beyond_capacity_reaches_issuer() {
        let mut tcam = nibble_encoder();
        tcam.write(CAPACITY, 1).unwrap();
        assert_eq!(tcam.issuer().issued.len(), 1, "table bounds are the accelerator's concern");
    }

    #[test]
    fn test_last_command_tracks_each_call() {
        let mut tcam = nibble_encoder();
        tcam.write(4, 0x44).unwrap();
        assert_eq!(tcam.last_command(), Some(&Command::new(CommandKind::Write, 4, 0x44)));

        tcam.search(0x44).unwrap();
        let last = tcam.last_command().unwrap();
        assert_eq!(last.kind, CommandKind::Search);
        assert!(last.write_enable);
        assert!(!last.chip_select);

        tcam.read_config().unwrap();
        assert_eq!(tcam.last_command().unwrap().funct(), FunctionCode::Config);
    }

    #[test]
    fn test_write_all_uses_successive_addresses() {
        let mut tcam = nibble_encoder();
        tcam.write_all([0xA, 0xB, 0xC]).unwrap();

        let addresses: Vec<u64> =
            tcam.issuer().issued.iter().map(|(_, rs1, _)| rs1 & 0x0FFF_FFFF).collect();
        assert_eq!(addresses, vec![0, 1, 2]);
    }

    #[test]
    fn test_command_display() {
        let command = Command::new(CommandKind::Search, 0, 0x1234_5678);
        assert_eq!(
            command.to_string(),
            "SEARCH addr=0x0000000 data=0x12345678 we=1 cs=0"
        );
    }
}
