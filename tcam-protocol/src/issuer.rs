//! Instruction-issue seam

use crate::{FunctionCode, Result};

/// Sends one custom instruction to the accelerator and returns `rd`
///
/// This is the only boundary to real hardware. Implementations are free to
/// encode the instruction however the platform requires; the protocol layer
/// only assumes four function codes, two source registers and one result
/// register.
///
/// A hardware issuer always returns `Ok`. Simulated issuers may surface
/// errors the accelerator would otherwise leave undefined, such as a WRITE
/// outside the entry table.
pub trait Issuer {
    /// Issue `funct` with source registers `rs1` and `rs2`
    ///
    /// # Arguments
    /// * `funct` - Function code selecting the operation
    /// * `rs1` - First source register
    /// * `rs2` - Second source register
    ///
    /// # Returns
    /// The value written to the result register (zero for WRITE)
    fn issue(&mut self, funct: FunctionCode, rs1: u64, rs2: u64) -> Result<u64>;
}

impl<I: Issuer + ?Sized> Issuer for &mut I {
    fn issue(&mut self, funct: FunctionCode, rs1: u64, rs2: u64) -> Result<u64> {
        (**self).issue(funct, rs1, rs2)
    }
}

impl<I: Issuer + ?Sized> Issuer for Box<I> {
    fn issue(&mut self, funct: FunctionCode, rs1: u64, rs2: u64) -> Result<u64> {
        (**self).issue(funct, rs1, rs2)
    }
}
