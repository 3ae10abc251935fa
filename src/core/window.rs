//! Capacity-bounded, FIFO-evicting sequence of metric samples.
//!
//! Mirrors the bounded-collection rule used for the in-memory event list:
//! a growing collection always has an explicit maximum, and the oldest
//! entries go first.

use std::collections::VecDeque;

use crate::core::metrics::MetricPoint;
use crate::util::constants::WINDOW_CAPACITY;

/// Rolling window of the most recent [`MetricPoint`]s, oldest first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    points: VecDeque<MetricPoint>,
    capacity: usize,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }
}

impl RollingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero capacity is bumped to one so an append is always visible.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting from the front until within capacity.
    pub fn append(&mut self, point: MetricPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Current contents in insertion order.
    pub fn snapshot(&self) -> Vec<MetricPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&MetricPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::test_point;

    #[test]
    fn test_append_below_capacity_keeps_all() {
        let mut w = RollingWindow::with_capacity(5);
        for i in 0..3 {
            w.append(test_point(i));
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.latest().unwrap().request_count, 2);
    }

    #[test]
    fn test_default_capacity_is_thirty() {
        let mut w = RollingWindow::new();
        for i in 0..45 {
            w.append(test_point(i));
        }
        let snap = w.snapshot();
        assert_eq!(snap.len(), 30);
        let counts: Vec<usize> = snap.iter().map(|p| p.request_count).collect();
        assert_eq!(counts, (15..45).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut w = RollingWindow::with_capacity(0);
        w.append(test_point(1));
        w.append(test_point(2));
        assert_eq!(w.capacity(), 1);
        assert_eq!(w.snapshot()[0].request_count, 2);
    }
}
