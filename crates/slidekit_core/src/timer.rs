//! Recurring timer with cancel semantics
//!
//! A `RecurringTimer` is the preferred shape for periodic work: instead of a
//! callback that re-posts itself (where a cancel can race the re-post), the
//! loop owns re-arming and [`RecurringTimer::cancel`] removes the pending task
//! atomically. The wrapped callback decides each fire whether to keep going by
//! returning a [`Control`].

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::event_loop::{Control, LoopHandle, TaskId};

/// A reusable periodic callback bound to a [`LoopHandle`]
///
/// Create once, then `start`/`cancel` across as many cycles as needed. At most
/// one task is pending per timer: `start` while already scheduled is a no-op.
pub struct RecurringTimer {
    handle: LoopHandle,
    interval: Duration,
    callback: Arc<dyn Fn() -> Control>,
    task: Option<TaskId>,
}

impl RecurringTimer {
    pub fn new<F>(handle: LoopHandle, interval: Duration, callback: F) -> Self
    where
        F: Fn() -> Control + 'static,
    {
        Self {
            handle,
            interval,
            callback: Arc::new(callback),
            task: None,
        }
    }

    /// Schedule the first fire after the configured interval
    ///
    /// Idempotent: if a fire is already pending, this does nothing, so calling
    /// `start` twice never doubles the firing rate.
    pub fn start(&mut self) {
        if let Some(id) = self.task {
            if self.handle.is_scheduled(id) {
                trace!(?id, "timer already scheduled");
                return;
            }
        }
        let callback = Arc::clone(&self.callback);
        self.task = Some(self.handle.post_repeating(self.interval, move || callback()));
    }

    /// Remove the pending fire, if any
    ///
    /// Safe to call when nothing is scheduled. The cancelled fire is
    /// guaranteed not to run.
    pub fn cancel(&mut self) {
        if let Some(id) = self.task.take() {
            self.handle.cancel(id);
        }
    }

    /// Whether a fire is currently pending
    pub fn is_scheduled(&self) -> bool {
        self.task.is_some_and(|id| self.handle.is_scheduled(id))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_loop::MainLoop;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counting_timer(
        main_loop: &MainLoop,
        interval: Duration,
    ) -> (RecurringTimer, Rc<RefCell<u32>>) {
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let timer = RecurringTimer::new(main_loop.handle(), interval, move || {
            *c.borrow_mut() += 1;
            Control::Continue
        });
        (timer, count)
    }

    #[test]
    fn fires_every_interval_after_start() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (mut timer, count) = counting_timer(&main_loop, ms(100));

        timer.start();
        main_loop.tick(t0 + ms(100));
        main_loop.tick(t0 + ms(200));
        main_loop.tick(t0 + ms(300));
        assert_eq!(*count.borrow(), 3);
        assert!(timer.is_scheduled());
    }

    #[test]
    fn start_is_idempotent() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (mut timer, count) = counting_timer(&main_loop, ms(100));

        timer.start();
        timer.start();
        timer.start();
        assert_eq!(main_loop.pending(), 1);

        main_loop.tick(t0 + ms(100));
        main_loop.tick(t0 + ms(200));
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn cancel_prevents_pending_fire() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (mut timer, count) = counting_timer(&main_loop, ms(100));

        timer.start();
        timer.cancel();
        main_loop.tick(t0 + ms(1000));
        assert_eq!(*count.borrow(), 0);
        assert!(!timer.is_scheduled());

        // Cancel with nothing pending is fine
        timer.cancel();
    }

    #[test]
    fn timer_restarts_after_cancel() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (mut timer, count) = counting_timer(&main_loop, ms(100));

        timer.start();
        timer.cancel();
        timer.start();
        main_loop.tick(t0 + ms(100));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn callback_stop_unschedules() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();

        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let mut timer = RecurringTimer::new(main_loop.handle(), ms(100), move || {
            *c.borrow_mut() += 1;
            Control::Stop
        });

        timer.start();
        main_loop.tick(t0 + ms(100));
        main_loop.tick(t0 + ms(200));
        assert_eq!(*count.borrow(), 1);
        assert!(!timer.is_scheduled());

        // Start after a self-stop schedules a fresh task
        timer.start();
        main_loop.tick(t0 + ms(300));
        assert_eq!(*count.borrow(), 2);
    }
}
