//! Single-threaded delayed task queue on a virtual millisecond clock
//!
//! Tasks fire in due-time order, ties broken by insertion order. While a task
//! is being handled the clock reads its due time, so work scheduled from inside
//! a handler is chained relative to when the parent fired rather than to the
//! wall clock of the pump.

use ahash::AHashMap;
use std::collections::BTreeMap;

/// Milliseconds on the scheduler clock
pub type Millis = u64;

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_id: u64,
    queue: BTreeMap<(Millis, u64), T>,
    due_by_id: AHashMap<u64, Millis>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: AHashMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Run `task` once `delay` ms have passed on the scheduler clock
    pub fn schedule(&mut self, delay: Millis, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, id), task);
        self.due_by_id.insert(id, due);
        TaskHandle(id)
    }

    /// Returns false if the task already ran or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.due_by_id.clear();
    }

    /// Pop the earliest task due at or before `until`
    ///
    /// Moves the clock to the task's due time. When nothing is due the clock
    /// moves to `until` instead. The clock never runs backwards.
    pub fn pop_due(&mut self, until: Millis) -> Option<T> {
        let due = self.queue.keys().next().map(|&(due, _)| due);
        match due {
            Some(due) if due <= until => {
                let ((due, id), task) = self.queue.pop_first()?;
                self.due_by_id.remove(&id);
                self.now = self.now.max(due);
                Some(task)
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}
