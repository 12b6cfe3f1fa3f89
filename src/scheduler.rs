//! Single cooperative timeline driven in virtual ticks.
//!
//! Tasks fire in order of due tick; tasks due on the same tick fire in the order they were
//! scheduled. Every scheduled task gets its own [`TimerId`], so cancelling one handle never
//! affects another.

use std::collections::BTreeMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, parse_display::Display)]
#[display("timer-{0}")]
pub struct TimerId(u64);

/// Virtual time unit. One tick is one second of dashboard time.
pub type Tick = u64;

#[derive(Debug)]
pub struct EventLoop<T> {
    now: Tick,
    next_id: u64,
    queue: BTreeMap<(Tick, u64), (TimerId, T)>,
    index: HashMap<TimerId, (Tick, u64)>,
}

impl<T> Default for EventLoop<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventLoop<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub const fn now(&self) -> Tick {
        self.now
    }

    /// Queues `task` to fire `delay` ticks from now.
    pub fn schedule(&mut self, delay: Tick, task: T) -> TimerId {
        let seq = self.next_id;
        self.next_id += 1;
        let id = TimerId(seq);
        let key = (self.now.saturating_add(delay), seq);
        self.queue.insert(key, (id, task));
        self.index.insert(id, key);
        id
    }

    /// Drops the task behind `id`. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.index
            .remove(&id)
            .and_then(|key| self.queue.remove(&key))
            .is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pops the earliest task due at or before `until`, moving the clock to its due tick.
    ///
    /// Once nothing else is due the clock is moved to `until`.
    pub fn pop_due(&mut self, until: Tick) -> Option<(TimerId, T)> {
        let due = self.queue.first_key_value().map(|(key, _)| *key);
        match due {
            Some(key @ (tick, _)) if tick <= until => {
                let (id, task) = self.queue.remove(&key)?;
                self.index.remove(&id);
                self.now = self.now.max(tick);
                Some((id, task))
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }
}
