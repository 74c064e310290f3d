//! Error taxonomy shared by the encoder and the model
//!
//! A SEARCH that finds nothing is not an error; it decodes to a
//! [`MatchResult`](crate::MatchResult) with `found == false`.

use thiserror::Error;

/// Errors raised by TCAM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TcamError {
    /// Address does not fit in the 28-bit addressable key space.
    /// Raised by the encoder before anything is issued.
    #[error("address {address:#x} exceeds the {bits}-bit address field")]
    InvalidAddress { address: u32, bits: u32 },

    /// WRITE target lies outside the entry table.
    /// Raised by the model; the table is left untouched.
    #[error("write to entry {address} is outside the table (capacity {capacity})")]
    OutOfRange { address: u32, capacity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TcamError::InvalidAddress { address: 0x1000_0000, bits: 28 };
        assert_eq!(err.to_string(), "address 0x10000000 exceeds the 28-bit address field");

        let err = TcamError::OutOfRange { address: 64, capacity: 64 };
        assert_eq!(
            err.to_string(),
            "write to entry 64 is outside the table (capacity 64)"
        );
    }
}
