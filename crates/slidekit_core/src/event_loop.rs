//! Host-driven event loop with delayed and repeating tasks
//!
//! `MainLoop` is a deadline-ordered queue of deferred callbacks. It owns no
//! thread: the host calls [`MainLoop::tick`] from its UI event loop, and every
//! due callback runs on that thread. Deadlines are computed against the loop
//! clock, which only advances when the host pumps `tick`, so tests can drive
//! the loop with synthetic instants.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use slidekit_core::{Control, MainLoop};
//!
//! let main_loop = MainLoop::new();
//! let handle = main_loop.handle();
//! handle.post_delayed(Duration::from_millis(16), || {
//!     // runs on the next tick at or after +16ms
//!     Control::Stop
//! });
//! let t0 = main_loop.now();
//! main_loop.tick(t0 + Duration::from_millis(16));
//! ```
//!
//! Cancellation is atomic with respect to dispatch: a task cancelled before
//! its deadline never runs, and a repeating task cancelled from inside its own
//! callback is not re-armed.

use slotmap::{new_key_type, SlotMap};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use tracing::{trace, warn};

new_key_type! {
    /// Handle to a scheduled task, used for cancellation
    pub struct TaskId;
}

/// Decision returned by a task callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep the task alive (repeating tasks re-arm after their interval)
    Continue,
    /// Drop the task; it will not fire again
    Stop,
}

type TaskFn = Box<dyn FnMut() -> Control>;

#[derive(Clone, Copy)]
enum Repeat {
    Once,
    Every(Duration),
}

struct Task {
    /// Taken out while the callback runs so no lock is held across user code
    callback: Option<TaskFn>,
    repeat: Repeat,
}

struct QueueEntry {
    deadline: Instant,
    /// Tie-breaker: equal deadlines fire in scheduling order
    seq: u64,
    id: TaskId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest deadline first
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct LoopInner {
    tasks: SlotMap<TaskId, Task>,
    queue: BinaryHeap<QueueEntry>,
    seq: u64,
    /// Loop clock: last instant passed to `tick`, never moves backwards
    now: Instant,
}

impl LoopInner {
    fn schedule(&mut self, delay: Duration, repeat: Repeat, callback: TaskFn) -> TaskId {
        let id = self.tasks.insert(Task {
            callback: Some(callback),
            repeat,
        });
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(QueueEntry {
            deadline: self.now + delay,
            seq,
            id,
        });
        id
    }
}

/// Deadline-ordered task queue pumped by the host UI thread
///
/// All callbacks run on whichever thread calls [`tick`](Self::tick); the loop
/// itself never spawns one.
pub struct MainLoop {
    inner: Arc<Mutex<LoopInner>>,
}

impl MainLoop {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LoopInner {
                tasks: SlotMap::with_key(),
                queue: BinaryHeap::new(),
                seq: 0,
                now: Instant::now(),
            })),
        }
    }

    /// Create a handle for posting and cancelling tasks
    ///
    /// Handles hold a weak reference: once the `MainLoop` is dropped, posts
    /// through surviving handles become no-ops.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current loop clock (advances only via `tick`)
    pub fn now(&self) -> Instant {
        self.inner.lock().unwrap().now
    }

    /// Number of tasks still registered (pending or mid-dispatch)
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    /// Earliest pending deadline, if any
    ///
    /// Hosts can use this to decide how long to sleep between pumps.
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut inner = self.inner.lock().unwrap();
        // Skip over entries whose task was cancelled after being queued
        while let Some(entry) = inner.queue.peek() {
            if inner.tasks.contains_key(entry.id) {
                return Some(entry.deadline);
            }
            inner.queue.pop();
        }
        None
    }

    /// Dispatch every task whose deadline is at or before `now`
    ///
    /// Tasks fire in deadline order, FIFO among equal deadlines. A repeating
    /// task that returns [`Control::Continue`] is re-armed at
    /// `now + interval`, measured from dispatch so a late pump does not cause
    /// a burst of catch-up fires. Returns the number of callbacks dispatched.
    pub fn tick(&self, now: Instant) -> usize {
        {
            let mut inner = self.inner.lock().unwrap();
            if now > inner.now {
                inner.now = now;
            }
        }
        let now = self.inner.lock().unwrap().now;

        let mut dispatched = 0;
        loop {
            // Pop the next due entry while locked; run its callback unlocked
            // so it may freely post or cancel.
            let (id, mut callback) = {
                let mut guard = self.inner.lock().unwrap();
                let due = matches!(guard.queue.peek(), Some(entry) if entry.deadline <= now);
                if !due {
                    break;
                }
                let entry = match guard.queue.pop() {
                    Some(entry) => entry,
                    None => break,
                };
                let Some(task) = guard.tasks.get_mut(entry.id) else {
                    // Cancelled after being queued
                    continue;
                };
                let Some(callback) = task.callback.take() else {
                    continue;
                };
                (entry.id, callback)
            };

            let control = callback();
            dispatched += 1;

            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            let rearm = match inner.tasks.get_mut(id) {
                Some(task) => match (control, task.repeat) {
                    (Control::Continue, Repeat::Every(interval)) => {
                        task.callback = Some(callback);
                        Some(interval)
                    }
                    _ => None,
                },
                // Cancelled from inside the callback: cancel wins over re-arm
                None => None,
            };
            match rearm {
                Some(interval) => {
                    let seq = inner.seq;
                    inner.seq += 1;
                    inner.queue.push(QueueEntry {
                        deadline: now + interval,
                        seq,
                        id,
                    });
                }
                None => {
                    inner.tasks.remove(id);
                }
            }
        }
        dispatched
    }
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap, cloneable handle for posting tasks onto a [`MainLoop`]
#[derive(Clone)]
pub struct LoopHandle {
    inner: Weak<Mutex<LoopInner>>,
}

impl LoopHandle {
    /// Schedule a one-shot callback after `delay`
    ///
    /// The callback's [`Control`] return value is ignored for one-shot tasks.
    /// Returns a null id (never scheduled) if the loop is gone.
    pub fn post_delayed<F>(&self, delay: Duration, callback: F) -> TaskId
    where
        F: FnMut() -> Control + 'static,
    {
        self.post(delay, Repeat::Once, Box::new(callback))
    }

    /// Schedule a repeating callback, first firing after `interval`
    ///
    /// The task re-arms every `interval` for as long as the callback returns
    /// [`Control::Continue`].
    pub fn post_repeating<F>(&self, interval: Duration, callback: F) -> TaskId
    where
        F: FnMut() -> Control + 'static,
    {
        // A zero interval would starve the tick loop
        let interval = interval.max(Duration::from_millis(1));
        self.post(interval, Repeat::Every(interval), Box::new(callback))
    }

    fn post(&self, delay: Duration, repeat: Repeat, callback: TaskFn) -> TaskId {
        let Some(inner) = self.inner.upgrade() else {
            warn!("event loop is gone; dropping posted task");
            return TaskId::default();
        };
        let id = inner.lock().unwrap().schedule(delay, repeat, callback);
        trace!(?id, delay_ms = delay.as_millis() as u64, "task posted");
        id
    }

    /// Remove a pending task
    ///
    /// Safe to call with an id that already fired, was already cancelled, or
    /// was never scheduled. A cancelled task is guaranteed not to run.
    pub fn cancel(&self, id: TaskId) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if inner.lock().unwrap().tasks.remove(id).is_some() {
            trace!(?id, "task cancelled");
        }
    }

    /// Whether `id` refers to a task that has not yet fired or been cancelled
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.lock().unwrap().tasks.contains_key(id),
            None => false,
        }
    }
}
