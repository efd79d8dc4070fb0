//! Deferred work driven by the host's frame clock
//!
//! Tasks fire on the first tick whose timestamp reaches their due time. There
//! is no cancellation; a task that outlives its subject must no-op.

/// Queue of tasks ordered by due time (ms)
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    /// Kept sorted by due time; equal due times keep insertion order
    pending: Vec<(f64, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, task: T) {
        let at = self.pending.partition_point(|(due, _)| *due <= due_ms);
        self.pending.insert(at, (due_ms, task));
    }

    /// Remove and return every task due at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let split = self.pending.partition_point(|(due, _)| *due <= now_ms);
        self.pending.drain(..split).map(|(_, task)| task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_due_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(1000.0, "a");
        assert!(queue.drain_due(999.9).is_empty());
        assert_eq!(queue.drain_due(1000.0), vec!["a"]);
        assert!(queue.drain_due(5000.0).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_order_then_insertion_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(300.0, 3);
        queue.schedule(100.0, 1);
        queue.schedule(300.0, 4);
        queue.schedule(200.0, 2);
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.drain_due(250.0), vec![1, 2]);
        assert_eq!(queue.drain_due(300.0), vec![3, 4]);
    }
}
