//! Constants and data types shared across the TCAM protocol

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of entries in the TCAM
pub const CAPACITY: u32 = 64;

/// Width of the address field in the first operand register
pub const ADDRESS_BITS: u32 = 28;

/// Mask selecting the address field
pub const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;

/// Mask selecting the index field of a result word.
///
/// One bit wider than needed to address the table so that the no-match
/// sentinel (`CAPACITY`) survives masking.
pub const INDEX_MASK: u32 = 0x7F;

/// Index reported when no entry matched
pub const NO_MATCH: u32 = CAPACITY;

/// Match-found flag carried in bit 31 of a STATUS word
pub const STATUS_FOUND_FLAG: u32 = 1 << 31;

/// Revision reported in the CONFIG word
pub const CONFIG_REVISION: u8 = 1;

/// One slot of the entry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Stored key (the data payload of the WRITE that filled this slot)
    pub key: u32,
    /// Whether the slot holds a live key
    pub valid: bool,
}

impl Entry {
    /// A live entry holding `key`
    pub fn occupied(key: u32) -> Self {
        Self { key, valid: true }
    }
}

/// Decoded outcome of a SEARCH or STATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    pub found: bool,
    pub index: u32,
}

impl MatchResult {
    /// The "no match" outcome, carrying the sentinel index
    pub const fn no_match() -> Self {
        Self { found: false, index: NO_MATCH }
    }

    /// A match at `index`
    pub const fn hit(index: u32) -> Self {
        Self { found: true, index }
    }

    /// Result word returned in `rd` by a SEARCH
    pub fn to_search_word(self) -> u32 {
        self.index & INDEX_MASK
    }

    /// Result word returned in `rd` by a STATUS
    pub fn to_status_word(self) -> u32 {
        let flag = if self.found { STATUS_FOUND_FLAG } else { 0 };
        flag | (self.index & INDEX_MASK)
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::no_match()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(f, "match at {}", self.index)
        } else {
            write!(f, "no match ({})", self.index)
        }
    }
}

/// Operation class of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Write,
    Search,
    Status,
    Config,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Write => "WRITE",
            CommandKind::Search => "SEARCH",
            CommandKind::Status => "STATUS",
            CommandKind::Config => "CONFIG",
        };
        f.write_str(name)
    }
}

/// Fixed geometry reported by CONFIG
///
/// Packed layout:
/// * bits `[15:0]`  - capacity
/// * bits `[23:16]` - key (address) width in bits
/// * bits `[31:24]` - revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDescriptor {
    pub capacity: u16,
    pub key_width: u8,
    pub revision: u8,
}

impl ConfigDescriptor {
    /// Descriptor of the 64x28 accelerator
    pub const fn standard() -> Self {
        Self {
            capacity: CAPACITY as u16,
            key_width: ADDRESS_BITS as u8,
            revision: CONFIG_REVISION,
        }
    }

    pub fn pack(&self) -> u32 {
        u32::from(self.capacity)
            | (u32::from(self.key_width) << 16)
            | (u32::from(self.revision) << 24)
    }

    pub fn unpack(word: u32) -> Self {
        Self {
            capacity: (word & 0xFFFF) as u16,
            key_width: ((word >> 16) & 0xFF) as u8,
            revision: (word >> 24) as u8,
        }
    }
}

impl Default for ConfigDescriptor {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_survives_index_mask() {
        assert_eq!(NO_MATCH & INDEX_MASK, NO_MATCH, "sentinel must not be masked away");
        assert!(INDEX_MASK >= CAPACITY);
    }

    #[test]
    fn test_status_word_layout() {
        assert_eq!(MatchResult::hit(5).to_status_word(), 0x8000_0005);
        assert_eq!(MatchResult::no_match().to_status_word(), 64);
        assert_eq!(MatchResult::hit(5).to_search_word(), 5);
    }

    #[test]
    fn test_config_descriptor_packing() {
        let word = ConfigDescriptor::standard().pack();
        assert_eq!(word, 0x011C_0040);
        assert_eq!(ConfigDescriptor::unpack(word), ConfigDescriptor::standard());
    }

    #[test]
    fn test_match_result_display() {
        assert_eq!(MatchResult::hit(3).to_string(), "match at 3");
        assert_eq!(MatchResult::no_match().to_string(), "no match (64)");
    }
}
