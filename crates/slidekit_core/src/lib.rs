//! UI-loop primitives for slidekit widgets.
//!
//! Widgets in slidekit never own a thread. Deferred work is posted onto a
//! [`MainLoop`] that the host pumps from its UI event loop, the same way a
//! platform toolkit pumps its message queue. Two building blocks live here:
//!
//! - [`MainLoop`] / [`LoopHandle`] - a deadline-ordered task queue with
//!   post-delayed, post-repeating, and cancel operations.
//! - [`RecurringTimer`] - an explicit recurring-timer wrapper with atomic
//!   cancel semantics, for callbacks that fire at a fixed interval.

pub mod event_loop;
pub mod timer;

pub use event_loop::{Control, LoopHandle, MainLoop, TaskId};
pub use timer::RecurringTimer;
