//! Reference TCAM model
//!
//! A software stand-in for the accelerator's entry table. It implements the
//! same observable behavior as the hardware so the command encoder and status
//! decoder can be tested end to end without silicon.

use crate::trace::{ModelTrace, TraceOp};
use crate::types::{ConfigDescriptor, Entry, MatchResult, CAPACITY};
use crate::{Result, TcamError};

/// Simulated TCAM with a fixed-capacity entry table
#[derive(Debug, Clone)]
pub struct TcamModel {
    /// Entry table, indexed by address
    entries: Vec<Entry>,
    /// Outcome of the most recent SEARCH
    last_match: MatchResult,
    /// Geometry reported by CONFIG
    descriptor: ConfigDescriptor,
    /// Optional operation trace
    trace: Option<ModelTrace>,
}

impl TcamModel {
    /// Create a model with every entry invalid and no previous match
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::default(); CAPACITY as usize],
            last_match: MatchResult::no_match(),
            descriptor: ConfigDescriptor::standard(),
            trace: None,
        }
    }

    /// Create a model that records up to `capacity` operations
    pub fn with_trace(capacity: usize) -> Self {
        Self {
            trace: Some(ModelTrace::new(capacity)),
            ..Self::new()
        }
    }

    /// WRITE: store `data` as the key of entry `address`
    ///
    /// Unconditionally replaces the previous occupant. Fails with
    /// [`TcamError::OutOfRange`] if `address >= CAPACITY`, leaving the table
    /// unchanged.
    pub fn write(&mut self, address: u32, data: u32) -> Result<()> {
        if address >= CAPACITY {
            tracing::debug!("Rejected write of {:#010x} to entry {}", data, address);
            self.record(TraceOp::WriteRejected { address, data });
            return Err(TcamError::OutOfRange { address, capacity: CAPACITY });
        }

        let slot = &mut self.entries[address as usize];
        let previous = *slot;
        *slot = Entry::occupied(data);

        tracing::debug!(
            "Entry {} <- {:#010x} (was {})",
            address,
            data,
            if previous.valid { format!("{:#010x}", previous.key) } else { "empty".to_string() }
        );
        self.record(TraceOp::Write { address, data, previous });
        Ok(())
    }

    /// SEARCH: find the lowest valid entry whose key equals `query`
    ///
    /// Never fails; an unmatched query yields [`MatchResult::no_match`]. The
    /// result becomes the value reported by [`TcamModel::status`].
    pub fn search(&mut self, query: u32) -> MatchResult {
        let result = self
            .entries
            .iter()
            .position(|entry| entry.valid && entry.key == query)
            .map(|index| MatchResult::hit(index as u32))
            .unwrap_or_else(MatchResult::no_match);

        tracing::debug!("Search {:#010x}: {}", query, result);
        self.last_match = result;
        self.record(TraceOp::Search { query, result });
        result
    }

    /// STATUS: report the outcome of the most recent SEARCH
    pub fn status(&mut self) -> MatchResult {
        let result = self.last_match;
        self.record(TraceOp::Status { result });
        result
    }

    /// CONFIG: report the packed geometry descriptor
    pub fn config(&mut self) -> u32 {
        let word = self.descriptor.pack();
        self.record(TraceOp::Config { word });
        word
    }

    /// Outcome of the most recent SEARCH, without tracing
    pub fn last_match(&self) -> MatchResult {
        self.last_match
    }

    /// Geometry behind the CONFIG word, unpacked
    pub fn descriptor(&self) -> ConfigDescriptor {
        self.descriptor
    }

    /// The whole entry table
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry at `index`, if inside the table
    pub fn entry(&self, index: u32) -> Option<&Entry> {
        self.entries.get(index as usize)
    }

    /// Number of entries holding a live key
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.valid).count()
    }

    /// Invalidate every entry and forget the last match
    ///
    /// The trace, if any, is kept.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting TCAM model");
        self.entries.iter_mut().for_each(|entry| *entry = Entry::default());
        self.last_match = MatchResult::no_match();
    }

    pub fn trace(&self) -> Option<&ModelTrace> {
        self.trace.as_ref()
    }

    fn record(&mut self, op: TraceOp) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(op);
        }
    }
}

impl Default for TcamModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_new_model_is_empty() {
        let tcam = TcamModel::new();
        assert_eq!(tcam.entries().len(), CAPACITY as usize);
        assert_eq!(tcam.valid_count(), 0);
        assert_eq!(tcam.last_match(), MatchResult::no_match());
    }

    #[test]
    fn test_write_then_search_roundtrip() {
        let mut rng = StdRng::seed_from_u64(0x7CA3);

        for _ in 0..256 {
            let mut tcam = TcamModel::new();
            let index = rng.gen_range(0..CAPACITY);
            let key: u32 = rng.gen();

            tcam.write(index, key).unwrap();
            assert_eq!(
                tcam.search(key),
                MatchResult::hit(index),
                "key {:#010x} written at {} should be found there",
                key,
                index
            );
        }
    }

    #[test]
    fn test_priority_lowest_index_wins() {
        let mut tcam = TcamModel::new();
        tcam.write(5, 0xCAFE_BABE).unwrap();
        tcam.write(2, 0xCAFE_BABE).unwrap();

        assert_eq!(tcam.search(0xCAFE_BABE), MatchResult::hit(2), "lower index should win");
    }

    #[test]
    fn test_overwrite_retires_old_key() {
        let mut tcam = TcamModel::new();
        tcam.write(0, 0xAAAA_0000).unwrap();
        tcam.write(0, 0xBBBB_0000).unwrap();

        assert!(!tcam.search(0xAAAA_0000).found, "old key should be gone");
        assert_eq!(tcam.search(0xBBBB_0000), MatchResult::hit(0));
        assert_eq!(tcam.valid_count(), 1);
    }

    #[test]
    fn test_identical_rewrite_is_noop() {
        let mut tcam = TcamModel::new();
        tcam.write(9, 42).unwrap();
        let before = tcam.entries().to_vec();
        tcam.write(9, 42).unwrap();
        assert_eq!(tcam.entries(), before.as_slice());
    }

    #[test]
    fn test_unwritten_key_returns_sentinel() {
        let mut tcam = TcamModel::new();
        tcam.write(0, 1).unwrap();

        let result = tcam.search(0xDEAD_C0DE);
        assert!(!result.found);
        assert_eq!(result.index, CAPACITY);
    }

    #[test]
    fn test_zero_key_does_not_match_empty_slots() {
        let mut tcam = TcamModel::new();
        assert_eq!(tcam.search(0), MatchResult::no_match(), "invalid entries must never match");
    }

    #[test]
    fn test_status_is_idempotent() {
        let mut tcam = TcamModel::new();
        tcam.write(3, 0x1111_1111).unwrap();
        tcam.search(0x1111_1111);

        let first = tcam.status();
        let second = tcam.status();
        assert_eq!(first, second);
        assert_eq!(first, MatchResult::hit(3));
    }

    #[test]
    fn test_status_follows_latest_search() {
        let mut tcam = TcamModel::new();
        tcam.write(1, 7).unwrap();
        tcam.search(7);
        tcam.search(8);
        assert_eq!(tcam.status(), MatchResult::no_match());
    }

    #[test]
    fn test_capacity_boundary() {
        let mut tcam = TcamModel::new();
        assert!(tcam.write(CAPACITY - 1, 0xEDCE_CA5E).is_ok());
        assert_eq!(
            tcam.write(CAPACITY, 0xEDCE_CA5E),
            Err(TcamError::OutOfRange { address: CAPACITY, capacity: CAPACITY })
        );
        assert_eq!(tcam.valid_count(), 1, "rejected write must not touch the table");
    }

    #[test]
    fn test_config_does_not_mutate() {
        let mut tcam = TcamModel::new();
        tcam.write(0, 5).unwrap();
        let word = tcam.config();

        assert_eq!(ConfigDescriptor::unpack(word), ConfigDescriptor::standard());
        assert_eq!(tcam.descriptor(), ConfigDescriptor::unpack(word));
        assert_eq!(tcam.descriptor().capacity as u32, CAPACITY);
        assert_eq!(tcam.valid_count(), 1);
    }

    #[test]
    fn test_reset_clears_table_and_status() {
        let mut tcam = TcamModel::new();
        tcam.write(4, 99).unwrap();
        tcam.search(99);
        tcam.reset();

        assert_eq!(tcam.valid_count(), 0);
        assert_eq!(tcam.last_match(), MatchResult::no_match());
        assert!(!tcam.search(99).found);
    }

    #[test]
    fn test_trace_records_operations() {
        let mut tcam = TcamModel::with_trace(16);
        tcam.write(0, 10).unwrap();
        tcam.write(CAPACITY, 10).unwrap_err();
        tcam.search(10);
        tcam.status();

        let trace = tcam.trace().unwrap();
        assert_eq!(trace.total_ops(), 4);
        assert_eq!(trace.write_count(), 1);
        assert_eq!(
            trace.records[1].op,
            TraceOp::WriteRejected { address: CAPACITY, data: 10 }
        );
    }
}
