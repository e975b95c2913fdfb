//! Bounded FIFO for trace entries produced before logging is configured.

use super::TraceEntry;

/// Once the buffer holds more than this many entries it is discarded.
pub const MAX_PENDING: usize = 100;

/// Pending trace entries in arrival order.
///
/// Overflow drops the whole buffer, not just the oldest entry.
#[derive(Debug, Default)]
pub struct TraceBuffer {
    entries: Vec<TraceEntry>,
    discarded: usize,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, clearing the buffer first if it is over capacity.
    pub fn record(&mut self, entry: TraceEntry) {
        if self.entries.len() > MAX_PENDING {
            self.discarded += self.entries.len();
            self.entries.clear();
        }
        self.entries.push(entry);
    }

    /// Remove and return all entries in arrival order.
    pub fn drain(&mut self) -> Vec<TraceEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped by overflow so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceLevel;

    fn entry(n: usize) -> TraceEntry {
        TraceEntry::new("test", TraceLevel::Debug, format!("event {}", n))
    }

    #[test]
    fn keeps_arrival_order() {
        let mut buffer = TraceBuffer::new();
        for n in 1..=3 {
            buffer.record(entry(n));
        }
        let messages: Vec<_> = buffer.drain().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["event 1", "event 2", "event 3"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn holds_up_to_101_entries() {
        let mut buffer = TraceBuffer::new();
        for n in 1..=101 {
            buffer.record(entry(n));
        }
        assert_eq!(buffer.len(), 101);
        assert_eq!(buffer.discarded(), 0);
    }

    #[test]
    fn overflow_clears_everything_then_accumulates() {
        let mut buffer = TraceBuffer::new();
        for n in 1..=150 {
            buffer.record(entry(n));
        }
        // entry 102 found 101 pending and cleared them
        assert_eq!(buffer.discarded(), 101);
        assert_eq!(buffer.len(), 49);
        assert_eq!(buffer.entries()[0].message, "event 102");
        assert_eq!(buffer.entries()[48].message, "event 150");
    }

    #[test]
    fn entry_right_after_clear_is_alone() {
        let mut buffer = TraceBuffer::new();
        for n in 1..=102 {
            buffer.record(entry(n));
        }
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.entries()[0].message, "event 102");
    }
}
