//! Status decoder
//!
//! Turns SEARCH and STATUS result words into [`MatchResult`]s. Decoding is
//! total: every 32-bit word maps to exactly one result.

use tcam_model::{MatchResult, CAPACITY, INDEX_MASK};

/// Decode a 32-bit result word.
///
/// Bits above [`INDEX_MASK`] are reserved and ignored. Any index at or above
/// [`CAPACITY`] means no match.
pub fn decode(raw: u32) -> MatchResult {
    let index = raw & INDEX_MASK;
    MatchResult { found: index < CAPACITY, index }
}

/// Decode a full result register; only its low word is significant
pub fn decode_register(rd: u64) -> MatchResult {
    decode(rd as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcam_model::{NO_MATCH, STATUS_FOUND_FLAG};

    #[test]
    fn test_decode_hit() {
        assert_eq!(decode(0), MatchResult::hit(0));
        assert_eq!(decode(63), MatchResult::hit(63));
    }

    #[test]
    fn test_decode_sentinel_and_beyond() {
        assert_eq!(decode(NO_MATCH), MatchResult::no_match());

        let above = decode(0x7F);
        assert!(!above.found, "any index >= CAPACITY is a miss");
        assert_eq!(above.index, 0x7F);
    }

    #[test]
    fn test_decode_ignores_reserved_bits() {
        assert_eq!(decode(STATUS_FOUND_FLAG | 5), MatchResult::hit(5));
        assert_eq!(decode(0xFFFF_FF80 | 12), MatchResult::hit(12));
        assert_eq!(decode(0x0000_0100 | NO_MATCH), MatchResult::no_match());
    }

    #[test]
    fn test_decode_matches_model_words() {
        for index in [0, 1, 31, 63] {
            let result = MatchResult::hit(index);
            assert_eq!(decode(result.to_search_word()), result);
            assert_eq!(decode(result.to_status_word()), result);
        }
        let miss = MatchResult::no_match();
        assert_eq!(decode(miss.to_status_word()), miss);
    }

    #[test]
    fn test_decode_register_truncates() {
        assert_eq!(decode_register(0xFFFF_FFFF_0000_0002), MatchResult::hit(2));
    }
}
