//! Data structures for model operation traces

use crate::types::{Entry, MatchResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded record of operations applied to a [`TcamModel`](crate::TcamModel)
///
/// When the trace is full the oldest record is dropped. Sequence numbers keep
/// counting so gaps are visible after eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrace {
    /// Records in issue order
    pub records: VecDeque<TraceRecord>,
    /// Maximum number of records kept
    pub capacity: usize,
    /// Sequence number of the next record
    next_seq: u64,
}

/// One traced operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Position in the operation stream, starting at 0
    pub seq: u64,
    /// What happened
    pub op: TraceOp,
}

/// Operation kinds as seen by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceOp {
    Write {
        address: u32,
        data: u32,
        /// Occupant of the slot before the write
        previous: Entry,
    },
    WriteRejected {
        address: u32,
        data: u32,
    },
    Search {
        query: u32,
        result: MatchResult,
    },
    Status {
        result: MatchResult,
    },
    Config {
        word: u32,
    },
}

impl ModelTrace {
    /// Create an empty trace keeping at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_seq: 0,
        }
    }

    /// Append a record, evicting the oldest if full
    pub fn push(&mut self, op: TraceOp) {
        if self.capacity == 0 {
            self.next_seq += 1;
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TraceRecord { seq: self.next_seq, op });
        self.next_seq += 1;
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of operations ever pushed, including evicted ones
    pub fn total_ops(&self) -> u64 {
        self.next_seq
    }

    /// Number of WRITE records held (accepted writes only)
    pub fn write_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.op, TraceOp::Write { .. }))
            .count()
    }

    /// Number of SEARCH records held
    pub fn search_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.op, TraceOp::Search { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_eviction_keeps_sequence() {
        let mut trace = ModelTrace::new(2);
        for query in 0..3 {
            trace.push(TraceOp::Search { query, result: MatchResult::no_match() });
        }

        assert_eq!(trace.len(), 2, "oldest record should be evicted");
        assert_eq!(trace.total_ops(), 3);
        assert_eq!(trace.records[0].seq, 1);
        assert_eq!(trace.records[1].seq, 2);
    }

    #[test]
    fn test_zero_capacity_trace_counts_only() {
        let mut trace = ModelTrace::new(0);
        trace.push(TraceOp::Config { word: 0 });
        assert!(trace.is_empty());
        assert_eq!(trace.total_ops(), 1);
    }

    #[test]
    fn test_trace_counts_by_kind() {
        let mut trace = ModelTrace::new(16);
        trace.push(TraceOp::Write { address: 0, data: 7, previous: Entry::default() });
        trace.push(TraceOp::WriteRejected { address: 64, data: 7 });
        trace.push(TraceOp::Search { query: 7, result: MatchResult::hit(0) });
        trace.push(TraceOp::Status { result: MatchResult::hit(0) });

        assert_eq!(trace.write_count(), 1);
        assert_eq!(trace.search_count(), 1);
    }

    #[test]
    fn test_trace_serialization() {
        let mut trace = ModelTrace::new(4);
        trace.push(TraceOp::Search { query: 1, result: MatchResult::no_match() });

        let json = serde_json::to_string(&trace).unwrap();
        let restored: ModelTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.records, trace.records);
        assert_eq!(restored.total_ops(), 1);
    }
}
