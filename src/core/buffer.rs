//! SampleBuffer: fixed-capacity rolling window per sensor channel
//!
//! Backed by a ring (slot array + head index): once full, each push
//! overwrites the oldest slot, so inserts are O(1) with no reallocation.

use crate::MIN_HISTORY_LENGTH;
use crate::types::SensorSample;

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    slots: Vec<SensorSample>,
    /// Index of the oldest sample once the ring is full
    head: usize,
    capacity: usize,
}

impl SampleBuffer {
    /// Create a buffer holding up to `history_length` samples.
    /// Capacities below two are raised to two.
    pub fn new(history_length: usize) -> Self {
        let capacity = history_length.max(MIN_HISTORY_LENGTH);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when at capacity. Never fails.
    pub fn push(&mut self, sample: SensorSample) {
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
        } else {
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Point-in-time copy, oldest first
    pub fn snapshot(&self) -> Vec<SensorSample> {
        self.iter().copied().collect()
    }

    /// Borrowing iterator, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SensorSample> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn latest(&self) -> Option<&SensorSample> {
        if self.slots.is_empty() {
            None
        } else if self.slots.len() < self.capacity || self.head == 0 {
            self.slots.last()
        } else {
            self.slots.get(self.head - 1)
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: i64) -> SensorSample {
        SensorSample::speed(t as f64, t)
    }

    #[test]
    fn test_fills_in_order() {
        let mut buf = SampleBuffer::new(4);
        for t in 0..3 {
            buf.push(sample(t));
        }
        let ts: Vec<i64> = buf.snapshot().iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(ts, vec![0, 1, 2]);
        assert_eq!(buf.latest().unwrap().timestamp_ms, 2);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buf = SampleBuffer::new(4);
        for t in 0..10 {
            buf.push(sample(t));
        }
        let ts: Vec<i64> = buf.snapshot().iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(ts, vec![6, 7, 8, 9]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.latest().unwrap().timestamp_ms, 9);
    }

    #[test]
    fn test_latest_when_head_wraps_to_zero() {
        let mut buf = SampleBuffer::new(3);
        for t in 0..6 {
            buf.push(sample(t));
        }
        assert_eq!(buf.latest().unwrap().timestamp_ms, 5);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buf = SampleBuffer::new(3);
        buf.push(sample(1));
        let snap = buf.snapshot();
        buf.push(sample(2));
        assert_eq!(snap.len(), 1);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_snapshot_idempotent() {
        let mut buf = SampleBuffer::new(3);
        for t in 0..5 {
            buf.push(sample(t));
        }
        assert_eq!(buf.snapshot(), buf.snapshot());
    }

    #[test]
    fn test_minimum_capacity() {
        let buf = SampleBuffer::new(0);
        assert_eq!(buf.capacity(), MIN_HISTORY_LENGTH);
    }

    #[test]
    fn test_clear() {
        let mut buf = SampleBuffer::new(3);
        buf.push(sample(1));
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.latest().is_none());
    }
}
