//! TCAM Model - Reference simulation of the TCAM accelerator
//!
//! This crate holds the shared constants and data types of the TCAM command
//! protocol together with a deterministic software model of the accelerator's
//! entry table.
//!
//! # Overview
//!
//! The model reproduces the observable behavior of the hardware:
//!
//! * A fixed table of [`CAPACITY`] entries, each holding a 32-bit key and a valid bit
//! * WRITE overwrites one entry unconditionally, rejecting indices outside the table
//! * SEARCH is priority-encoded: the lowest matching index wins
//! * STATUS reports the result of the most recent SEARCH
//! * CONFIG reports a fixed [`ConfigDescriptor`]
//!
//! # Usage
//!
//! ```
//! use tcam_model::{TcamModel, CAPACITY};
//!
//! let mut tcam = TcamModel::new();
//! tcam.write(0, 0x1234_5678).unwrap();
//! tcam.write(1, 0xABCD_EF00).unwrap();
//!
//! let hit = tcam.search(0x1234_5678);
//! assert!(hit.found);
//! assert_eq!(hit.index, 0);
//!
//! let miss = tcam.search(0xDEAD_C0DE);
//! assert!(!miss.found);
//! assert_eq!(miss.index, CAPACITY);
//! ```
//!
//! # Limitations
//!
//! * Keys are matched exactly; ternary (don't-care) key bits are not modelled.
//! * The model is single-issuer. Use [`SharedTcam`] when several threads need
//!   the same table.

pub mod error;
pub mod model;
pub mod shared;
pub mod trace;
pub mod types;

pub use error::TcamError;
pub use model::TcamModel;
pub use shared::SharedTcam;
pub use trace::{ModelTrace, TraceOp, TraceRecord};
pub use types::{
    CommandKind, ConfigDescriptor, Entry, MatchResult, ADDRESS_BITS, ADDRESS_MASK, CAPACITY,
    CONFIG_REVISION, INDEX_MASK, NO_MATCH, STATUS_FOUND_FLAG,
};

/// Result type for TCAM model operations
pub type Result<T> = std::result::Result<T, TcamError>;
