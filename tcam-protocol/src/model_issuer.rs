//! Issuers backed by the reference model
//!
//! These decode operand registers the way the accelerator does and apply the
//! operation to a [`TcamModel`], so the encoder can be exercised end to end
//! without hardware.

use crate::packing::WriteOperands;
use crate::{CommandEncoder, FunctionCode, Issuer, ProtocolVersion, Result};
use std::borrow::{Borrow, BorrowMut};
use tcam_model::{SharedTcam, TcamModel};

/// [`Issuer`] that executes instructions against a [`TcamModel`]
///
/// `M` is either an owned model or a `&mut TcamModel` borrowed for the
/// duration of a transaction.
#[derive(Debug)]
pub struct ModelIssuer<M = TcamModel> {
    model: M,
    protocol: ProtocolVersion,
}

impl<M: BorrowMut<TcamModel>> ModelIssuer<M> {
    pub fn new(model: M, protocol: ProtocolVersion) -> Self {
        Self { model, protocol }
    }

    pub fn model(&self) -> &TcamModel {
        <M as Borrow<TcamModel>>::borrow(&self.model)
    }

    pub fn model_mut(&mut self) -> &mut TcamModel {
        <M as BorrowMut<TcamModel>>::borrow_mut(&mut self.model)
    }

    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }

    pub fn into_model(self) -> M {
        self.model
    }
}

impl Default for ModelIssuer<TcamModel> {
    fn default() -> Self {
        Self::new(TcamModel::new(), ProtocolVersion::default())
    }
}

impl<M: BorrowMut<TcamModel>> Issuer for ModelIssuer<M> {
    fn issue(&mut self, funct: FunctionCode, rs1: u64, rs2: u64) -> Result<u64> {
        let protocol = self.protocol;
        execute(self.model_mut(), protocol, funct, rs1, rs2)
    }
}

/// Issuer handle for a [`SharedTcam`]
///
/// The table is only reachable through [`SharedIssuer::transaction`], which
/// holds the model lock for the whole closure. A SEARCH and the STATUS that
/// follows it inside one transaction can never observe another issuer's
/// traffic.
#[derive(Debug, Clone)]
pub struct SharedIssuer {
    tcam: SharedTcam,
    protocol: ProtocolVersion,
}

impl SharedIssuer {
    pub fn new(tcam: SharedTcam, protocol: ProtocolVersion) -> Self {
        Self { tcam, protocol }
    }

    pub fn tcam(&self) -> &SharedTcam {
        &self.tcam
    }

    /// Run `f` with an encoder that holds the model lock throughout
    pub fn transaction<R>(
        &self,
        f: impl FnOnce(&mut CommandEncoder<ModelIssuer<&mut TcamModel>>) -> R,
    ) -> R {
        let protocol = self.protocol;
        self.tcam.with_locked(|model| {
            let mut encoder = CommandEncoder::new(ModelIssuer::new(model, protocol), protocol);
            f(&mut encoder)
        })
    }
}

/// Accelerator-side decode and execute of one instruction
fn execute(
    model: &mut TcamModel,
    protocol: ProtocolVersion,
    funct: FunctionCode,
    rs1: u64,
    rs2: u64,
) -> Result<u64> {
    match funct {
        FunctionCode::Write => {
            let (address, data) = match protocol {
                ProtocolVersion::ControlNibble => {
                    let operands = nibble_operands(funct, rs1, rs2);
                    (operands.address, operands.data)
                }
                ProtocolVersion::SplitFunct => (rs2 as u32, rs1 as u32),
            };
            model.write(address, data)?;
            Ok(0)
        }
        FunctionCode::Search => {
            let query = match protocol {
                ProtocolVersion::ControlNibble => nibble_operands(funct, rs1, rs2).data,
                ProtocolVersion::SplitFunct => rs1 as u32,
            };
            Ok(u64::from(model.search(query).to_search_word()))
        }
        FunctionCode::Status => Ok(u64::from(model.status().to_status_word())),
        FunctionCode::Config => Ok(u64::from(model.config())),
    }
}

/// Unpack control-nibble operands; the function code wins over the nibble
fn nibble_operands(funct: FunctionCode, rs1: u64, rs2: u64) -> WriteOperands {
    let operands = WriteOperands::decode(rs1, rs2);
    if operands.nibble.funct() != funct {
        tracing::warn!(
            "Control nibble selects {} but instruction carries {}; using the function code",
            operands.nibble.funct(),
            funct
        );
    }
    operands
}
