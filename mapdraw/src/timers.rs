//! Scheduled continuations on a virtual millisecond clock.
//!
//! The host drives time through `pop_due`/`settle`; nothing here blocks.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: f64,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: f64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue { now: 0.0, next_id: 1, entries: Vec::new() }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to fire `delay_ms` after the current clock.
    pub fn schedule(&mut self, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due: self.now + delay_ms.max(0.0), payload });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn next_due(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.due).reduce(f64::min)
    }

    /// Removes the earliest entry due at or before `until` and moves the clock to its due time.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<T> {
        let (idx, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))?;
        let entry = self.entries.remove(idx);
        self.now = self.now.max(entry.due);
        Some(entry.payload)
    }

    /// Moves the clock forward once every due entry has been drained.
    pub fn settle(&mut self, until: f64) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(200.0, "b");
        q.schedule(100.0, "a");
        q.schedule(100.0, "a2");
        assert_eq!(q.pop_due(50.0), None);
        assert_eq!(q.pop_due(1000.0), Some("a"));
        assert_eq!(q.now(), 100.0);
        assert_eq!(q.pop_due(1000.0), Some("a2"));
        assert_eq!(q.pop_due(1000.0), Some("b"));
        assert!(q.is_empty());
    }

    #[test]
    fn delays_are_relative_to_clock() {
        let mut q = TimerQueue::new();
        q.settle(500.0);
        q.schedule(100.0, 1);
        assert_eq!(q.next_due(), Some(600.0));
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10.0, ());
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert_eq!(q.pop_due(100.0), None);
    }
}
