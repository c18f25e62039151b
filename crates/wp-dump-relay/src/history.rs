//! Bounded, newest-first history of received dumps

use crate::record::DumpRecord;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Ring of the most recent dumps; the oldest is evicted once full
#[derive(Debug, Clone)]
pub struct DumpHistory {
    capacity: usize,
    records: VecDeque<DumpRecord>,
}

impl DumpHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: DumpRecord) {
        if self.capacity == 0 {
            return;
        }
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records, most recent first
    pub fn records(&self) -> impl Iterator<Item = &DumpRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DumpHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
