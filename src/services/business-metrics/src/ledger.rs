//! Bounded FIFO history of computed snapshots

use roi_shared::MetricSnapshot;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of snapshots kept
pub const DEFAULT_LEDGER_CAPACITY: usize = 50;

/// Snapshot history, oldest first.
///
/// Grows by [`HistoryLedger::append`] and shrinks only by evicting the
/// oldest entry once full.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    entries: VecDeque<Arc<MetricSnapshot>>,
    capacity: usize,
}

impl HistoryLedger {
    /// A zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a snapshot, returning the evicted entry when at capacity
    pub fn append(&mut self, snapshot: Arc<MetricSnapshot>) -> Option<Arc<MetricSnapshot>> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };

        self.entries.push_back(snapshot);
        evicted
    }

    /// Every retained snapshot, oldest first
    pub fn all(&self) -> Vec<Arc<MetricSnapshot>> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<Arc<MetricSnapshot>> {
        self.entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}
