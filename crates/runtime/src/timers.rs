use foundation::time::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Millis,
    payload: T,
}

/// Deterministic one-shot timers driven by caller-supplied time.
///
/// Due timers fire in `(deadline, id)` order, so timers sharing a deadline
/// fire in scheduling order. The host (browser `setTimeout`, a test) decides
/// when to call [`TimerQueue::pop_due`]; dropping a viewing session is just
/// [`TimerQueue::cancel_all`].
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schedule(&mut self, deadline: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            deadline,
            payload,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drops every pending timer, returning how many were released.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Removes and returns every timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Millis) -> Vec<(TimerId, T)> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.deadline <= now {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;

        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|e| (e.id, e.payload)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Millis;

    #[test]
    fn fires_due_timers_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(Millis(30), "c");
        q.schedule(Millis(10), "a");
        q.schedule(Millis(10), "b");
        q.schedule(Millis(99), "late");

        let fired: Vec<_> = q.pop_due(Millis(30)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(Millis(99)));
    }

    #[test]
    fn canceled_timers_never_fire() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Millis(5), 1);
        q.schedule(Millis(6), 2);
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.pop_due(Millis(10)).len(), 1);

        q.schedule(Millis(20), 3);
        q.schedule(Millis(21), 4);
        assert_eq!(q.cancel_all(), 2);
        assert!(q.pop_due(Millis(100)).is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
