//! Operand register layouts
//!
//! All shifts and masks for the operand registers live here. Call sites build
//! a [`WriteOperands`] and never touch raw bits.
//!
//! `ControlNibble` layout of `rs1` (only the low 32 bits are meaningful):
//!
//! ```text
//!  31  30 | 29 | 28 | 27 ........................... 0
//!  wmask  | cs | we |            address
//! ```
//!
//! * `we` - write enable, active low (0 = write, 1 = query)
//! * `cs` - chip select, active low (0 = table access, 1 = status/config)
//! * `wmask` - write mask, `0b11` selects the full word
//!
//! `rs2` carries the 32-bit data payload.

use crate::{FunctionCode, Result};
use serde::{Deserialize, Serialize};
use tcam_model::{TcamError, ADDRESS_BITS, ADDRESS_MASK};

/// Bit position of the control nibble in `rs1`
pub const NIBBLE_SHIFT: u32 = ADDRESS_BITS;

const WE_BIT: u8 = 0b0001;
const CS_BIT: u8 = 0b0010;
const WMASK_SHIFT: u8 = 2;

/// 2-bit write mask carried in the top of the control nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriteMask(u8);

impl WriteMask {
    /// Full-word write; the only mask the encoder emits
    pub const FULL: WriteMask = WriteMask(0b11);

    /// Build a mask from its low two bits
    pub const fn from_bits(bits: u8) -> Self {
        WriteMask(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for WriteMask {
    fn default() -> Self {
        WriteMask::FULL
    }
}

/// Control nibble packed above the address field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlNibble {
    pub write_mask: WriteMask,
    /// Active-low chip select as transmitted (`true` = deasserted)
    pub chip_select: bool,
    /// Active-low write enable as transmitted (`true` = query mode)
    pub write_enable: bool,
}

impl ControlNibble {
    /// Nibble for the given function code with a full write mask
    pub const fn for_funct(funct: FunctionCode) -> Self {
        let (write_enable, chip_select) = funct.signals();
        Self { write_mask: WriteMask::FULL, chip_select, write_enable }
    }

    /// Function code the nibble's control signals select
    pub const fn funct(self) -> FunctionCode {
        FunctionCode::from_signals(self.write_enable, self.chip_select)
    }

    pub const fn to_bits(self) -> u8 {
        let mut bits = self.write_mask.bits() << WMASK_SHIFT;
        if self.chip_select {
            bits |= CS_BIT;
        }
        if self.write_enable {
            bits |= WE_BIT;
        }
        bits
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self {
            write_mask: WriteMask::from_bits(bits >> WMASK_SHIFT),
            chip_select: bits & CS_BIT != 0,
            write_enable: bits & WE_BIT != 0,
        }
    }
}

/// Operands of a WRITE or SEARCH in the control-nibble layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOperands {
    pub nibble: ControlNibble,
    /// 28-bit address field
    pub address: u32,
    /// Data payload (`rs2`)
    pub data: u32,
}

impl WriteOperands {
    pub fn new(funct: FunctionCode, address: u32, data: u32) -> Self {
        Self { nibble: ControlNibble::for_funct(funct), address, data }
    }

    /// Pack into `(rs1, rs2)`.
    ///
    /// Fails with [`TcamError::InvalidAddress`] if the address does not fit
    /// the 28-bit field.
    pub fn encode(&self) -> Result<(u64, u64)> {
        let address = check_address(self.address)?;
        let rs1 = (u32::from(self.nibble.to_bits()) << NIBBLE_SHIFT) | address;
        Ok((u64::from(rs1), u64::from(self.data)))
    }

    /// Unpack `(rs1, rs2)`; bits above the low word are ignored
    pub fn decode(rs1: u64, rs2: u64) -> Self {
        let rs1 = rs1 as u32;
        Self {
            nibble: ControlNibble::from_bits((rs1 >> NIBBLE_SHIFT) as u8),
            address: rs1 & ADDRESS_MASK,
            data: rs2 as u32,
        }
    }
}

/// Reject addresses that overflow the 28-bit field
pub fn check_address(address: u32) -> Result<u32> {
    if address > ADDRESS_MASK {
        return Err(TcamError::InvalidAddress { address, bits: ADDRESS_BITS });
    }
    Ok(address)
}
