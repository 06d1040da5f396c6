//! Auto-sliding page carousel widget
//!
//! `PageSlider` hosts a paged container plus an optional page indicator,
//! enforces an aspect-ratio sizing policy, and drives auto-advance from its
//! attach/detach lifecycle. It runs entirely on the host UI loop: the
//! auto-slide callback is a deferred task on a [`MainLoop`], never a thread.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use slidekit_core::MainLoop;
//! use slidekit_widget::prelude::*;
//!
//! let main_loop = MainLoop::new();
//! let attrs = StyleAttrs::new()
//!     .with(ATTR_AUTO_SLIDE, "true")
//!     .with(ATTR_AUTO_SLIDE_DURATION, "1000");
//! let slider = PageSlider::builder(main_loop.handle())
//!     .attrs(&attrs)
//!     .pager(SimplePager::new())
//!     .build();
//!
//! slider.set_adapter(Arc::new(FixedAdapter::new(5)));
//! slider.on_attached();
//! // host pumps main_loop.tick(..) from its event loop
//! ```
//!
//! [`MainLoop`]: slidekit_core::MainLoop
//!
//! # Lifecycle
//!
//! Auto-slide is active exactly while the widget is attached AND the
//! auto-slide flag is set. Attach starts the timer, detach cancels it, and
//! the timer callback holds only a weak back-reference, so a slider dropped
//! mid-flight leaves an inert task behind that the loop drops on its next
//! pump.

use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, trace};

use slidekit_core::{Control, LoopHandle, RecurringTimer};

use crate::pager::{PageIndicator, PagedView, PagerAdapter};
use crate::style::{SliderStyle, StyleAttrs};

/// Measured extent of a widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Observable lifecycle state of a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    /// Not on screen; no callback may be pending
    Detached,
    /// On screen with no auto-slide fire pending
    AttachedIdle,
    /// On screen with an auto-slide fire pending
    AttachedSliding,
}

struct SliderInner {
    style: SliderStyle,
    handle: LoopHandle,
    pager: Option<Box<dyn PagedView>>,
    indicator: Option<Box<dyn PageIndicator>>,
    auto_slide_enabled: bool,
    attached: bool,
    /// Created lazily on first start, reused across start/stop cycles
    timer: Option<RecurringTimer>,
}

impl SliderInner {
    /// Timer-driven: move to the next page and decide whether to keep firing
    fn advance(&mut self) -> Control {
        let Some(pager) = self.pager.as_mut() else {
            return Control::Stop;
        };
        let next = pager.current_item() + 1;
        pager.set_current_item(next, true);
        trace!(page = next, "auto-slide advance");
        if self.auto_slide_enabled {
            Control::Continue
        } else {
            Control::Stop
        }
    }
}

/// Builder for [`PageSlider`]
///
/// Collaborators are optional; operations that need an absent one become
/// no-ops rather than errors.
pub struct PageSliderBuilder {
    handle: LoopHandle,
    style: SliderStyle,
    pager: Option<Box<dyn PagedView>>,
    indicator: Option<Box<dyn PageIndicator>>,
}

impl PageSliderBuilder {
    /// Resolve styling from an attribute bag (missing attributes take
    /// defaults, malformed ones are logged and defaulted)
    pub fn attrs(mut self, attrs: &StyleAttrs) -> Self {
        self.style = SliderStyle::from_attrs(attrs);
        self
    }

    pub fn style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn pager(mut self, pager: impl PagedView + 'static) -> Self {
        self.pager = Some(Box::new(pager));
        self
    }

    pub fn indicator(mut self, indicator: impl PageIndicator + 'static) -> Self {
        self.indicator = Some(Box::new(indicator));
        self
    }

    pub fn build(self) -> PageSlider {
        let auto_slide_enabled = self.style.auto_slide;
        debug!(
            ratio = self.style.aspect_ratio,
            auto_slide = auto_slide_enabled,
            interval_ms = self.style.interval.as_millis() as u64,
            "page slider created"
        );
        PageSlider {
            inner: Arc::new(Mutex::new(SliderInner {
                style: self.style,
                handle: self.handle,
                pager: self.pager,
                indicator: self.indicator,
                auto_slide_enabled,
                attached: false,
                timer: None,
            })),
        }
    }
}

/// Auto-sliding carousel over a paged container
pub struct PageSlider {
    inner: Arc<Mutex<SliderInner>>,
}

impl PageSlider {
    pub fn builder(handle: LoopHandle) -> PageSliderBuilder {
        PageSliderBuilder {
            handle,
            style: SliderStyle::default(),
            pager: None,
            indicator: None,
        }
    }

    /// Aspect-ratio sizing policy: height is derived from the offered width
    ///
    /// Deterministic and non-recursive: `height = round(ratio * width)`.
    pub fn measure(&self, available_width: f32) -> Size {
        let ratio = self.inner.lock().unwrap().style.aspect_ratio;
        Size {
            width: available_width,
            height: (ratio * available_width).round(),
        }
    }

    /// Lifecycle: the widget came on screen
    pub fn on_attached(&self) {
        self.inner.lock().unwrap().attached = true;
        self.start_auto_slide();
    }

    /// Lifecycle: the widget left the screen
    ///
    /// Cancels any pending auto-slide fire so no timer leaks past detach.
    pub fn on_detached(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.attached = false;
        if let Some(timer) = inner.timer.as_mut() {
            timer.cancel();
        }
    }

    /// Assign the paged container's content source
    ///
    /// Binds the indicator to the pager and shows it only when there is more
    /// than one page. Skipped entirely when the pager is absent; the
    /// indicator steps are skipped when the indicator is absent.
    pub fn set_adapter(&self, adapter: Arc<dyn PagerAdapter>) {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        let Some(pager) = inner.pager.as_mut() else {
            return;
        };
        let count = adapter.count();
        pager.set_adapter(adapter);
        if let Some(indicator) = inner.indicator.as_mut() {
            indicator.bind(pager.as_ref());
            indicator.set_visible(count > 1);
        }
    }

    /// Begin the auto-slide loop
    ///
    /// No-op unless auto-slide is enabled and the widget is attached.
    /// Idempotent: a second call while a fire is pending does not
    /// double-schedule. The callback is created once and reused across
    /// start/stop cycles.
    pub fn start_auto_slide(&self) {
        let weak = Arc::downgrade(&self.inner);
        let mut inner = self.inner.lock().unwrap();
        if !inner.auto_slide_enabled || !inner.attached {
            trace!(
                enabled = inner.auto_slide_enabled,
                attached = inner.attached,
                "auto-slide not started"
            );
            return;
        }
        if inner.timer.is_none() {
            inner.timer = Some(auto_slide_timer(
                inner.handle.clone(),
                inner.style.interval,
                weak,
            ));
        }
        if let Some(timer) = inner.timer.as_mut() {
            timer.start();
        }
    }

    /// Cancel any pending auto-slide fire; safe when none is pending
    pub fn stop_auto_slide(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(timer) = inner.timer.as_mut() {
            timer.cancel();
        }
    }

    /// Toggle the auto-slide flag
    ///
    /// Does not start or cancel an in-flight fire; the flag is consulted at
    /// the next scheduling decision (a pending fire still advances once, then
    /// stops re-arming if disabled).
    pub fn set_auto_slide_enabled(&self, enabled: bool) {
        self.inner.lock().unwrap().auto_slide_enabled = enabled;
    }

    pub fn is_auto_slide_enabled(&self) -> bool {
        self.inner.lock().unwrap().auto_slide_enabled
    }

    /// Current page of the hosted pager, if one is present
    pub fn current_page(&self) -> Option<usize> {
        self.inner
            .lock()
            .unwrap()
            .pager
            .as_ref()
            .map(|pager| pager.current_item())
    }

    pub fn state(&self) -> SlideState {
        let inner = self.inner.lock().unwrap();
        if !inner.attached {
            SlideState::Detached
        } else if inner.timer.as_ref().is_some_and(RecurringTimer::is_scheduled) {
            SlideState::AttachedSliding
        } else {
            SlideState::AttachedIdle
        }
    }
}

/// Build the auto-slide timer
///
/// The callback holds a weak back-reference only: it must never extend the
/// slider's lifetime past its on-screen presence. Once the slider is gone the
/// callback returns `Stop`, which also drops the loop task.
fn auto_slide_timer(
    handle: LoopHandle,
    interval: std::time::Duration,
    slider: Weak<Mutex<SliderInner>>,
) -> RecurringTimer {
    RecurringTimer::new(handle, interval, move || match slider.upgrade() {
        Some(inner) => inner.lock().unwrap().advance(),
        None => Control::Stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::{FixedAdapter, SimplePager};
    use crate::style::{ATTR_AUTO_SLIDE, ATTR_AUTO_SLIDE_DURATION};
    use slidekit_core::MainLoop;
    use std::time::Duration;

    /// Pager that records every programmatic page change
    struct ProbePager {
        pager: SimplePager,
        log: Arc<Mutex<Vec<(usize, bool)>>>,
    }

    impl ProbePager {
        fn new() -> (Self, Arc<Mutex<Vec<(usize, bool)>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let probe = Self {
                pager: SimplePager::new(),
                log: Arc::clone(&log),
            };
            (probe, log)
        }
    }

    impl PagedView for ProbePager {
        fn set_adapter(&mut self, adapter: Arc<dyn PagerAdapter>) {
            self.pager.set_adapter(adapter);
        }

        fn current_item(&self) -> usize {
            self.pager.current_item()
        }

        fn set_current_item(&mut self, index: usize, animated: bool) {
            self.log.lock().unwrap().push((index, animated));
            self.pager.set_current_item(index, animated);
        }
    }

    /// Indicator that records binding and visibility
    struct ProbeIndicator {
        bound: Arc<Mutex<bool>>,
        visible: Arc<Mutex<Option<bool>>>,
    }

    impl ProbeIndicator {
        fn new() -> (Self, Arc<Mutex<bool>>, Arc<Mutex<Option<bool>>>) {
            let bound = Arc::new(Mutex::new(false));
            let visible = Arc::new(Mutex::new(None));
            let probe = Self {
                bound: Arc::clone(&bound),
                visible: Arc::clone(&visible),
            };
            (probe, bound, visible)
        }
    }

    impl PageIndicator for ProbeIndicator {
        fn bind(&mut self, _pager: &dyn PagedView) {
            *self.bound.lock().unwrap() = true;
        }

        fn set_visible(&mut self, visible: bool) {
            *self.visible.lock().unwrap() = Some(visible);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn auto_style(interval_ms: u64) -> StyleAttrs {
        StyleAttrs::new()
            .with(ATTR_AUTO_SLIDE, "true")
            .with(ATTR_AUTO_SLIDE_DURATION, interval_ms.to_string())
    }

    /// Slider with auto-slide on, a probed pager, and `pages` pages
    fn sliding_fixture(
        main_loop: &MainLoop,
        interval_ms: u64,
        pages: usize,
    ) -> (PageSlider, Arc<Mutex<Vec<(usize, bool)>>>) {
        let (pager, log) = ProbePager::new();
        let slider = PageSlider::builder(main_loop.handle())
            .attrs(&auto_style(interval_ms))
            .pager(pager)
            .build();
        slider.set_adapter(Arc::new(FixedAdapter::new(pages)));
        (slider, log)
    }

    #[test]
    fn measure_rounds_height_from_ratio() {
        let main_loop = MainLoop::new();
        let slider = PageSlider::builder(main_loop.handle())
            .style(SliderStyle {
                aspect_ratio: 0.5,
                ..SliderStyle::default()
            })
            .build();
        assert_eq!(
            slider.measure(200.0),
            Size {
                width: 200.0,
                height: 100.0
            }
        );

        let slider = PageSlider::builder(main_loop.handle()).build();
        // default ratio 0.32: 360 * 0.32 = 115.2 -> 115
        assert_eq!(slider.measure(360.0).height, 115.0);
        assert_eq!(slider.measure(100.0).height, 32.0);
        assert_eq!(slider.measure(0.0).height, 0.0);
    }

    #[test]
    fn attach_starts_auto_slide_only_when_enabled() {
        let main_loop = MainLoop::new();
        let (slider, _log) = sliding_fixture(&main_loop, 1000, 5);
        assert_eq!(slider.state(), SlideState::Detached);
        slider.on_attached();
        assert_eq!(slider.state(), SlideState::AttachedSliding);

        let disabled = PageSlider::builder(main_loop.handle())
            .pager(SimplePager::new())
            .build();
        disabled.on_attached();
        assert_eq!(disabled.state(), SlideState::AttachedIdle);
    }

    #[test]
    fn advance_fires_once_per_interval() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();

        main_loop.tick(t0 + ms(999));
        assert!(log.lock().unwrap().is_empty());

        main_loop.tick(t0 + ms(1000));
        assert_eq!(*log.lock().unwrap(), vec![(1, true)]);
        assert_eq!(slider.current_page(), Some(1));

        main_loop.tick(t0 + ms(2000));
        assert_eq!(*log.lock().unwrap(), vec![(1, true), (2, true)]);
        assert_eq!(slider.current_page(), Some(2));
    }

    #[test]
    fn start_then_immediate_stop_never_advances() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();
        slider.stop_auto_slide();
        assert_eq!(slider.state(), SlideState::AttachedIdle);

        main_loop.tick(t0 + ms(60_000));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn detach_cancels_pending_fire() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();
        main_loop.tick(t0 + ms(1000));
        assert_eq!(log.lock().unwrap().len(), 1);

        slider.on_detached();
        assert_eq!(slider.state(), SlideState::Detached);
        main_loop.tick(t0 + ms(60_000));
        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(main_loop.pending(), 0);
    }

    #[test]
    fn reattach_resumes_sliding() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();
        slider.on_detached();
        slider.on_attached();
        assert_eq!(slider.state(), SlideState::AttachedSliding);

        main_loop.tick(t0 + ms(1000));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn disable_takes_effect_at_next_scheduling_decision() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();

        // Disabling does not cancel the in-flight fire...
        slider.set_auto_slide_enabled(false);
        assert_eq!(slider.state(), SlideState::AttachedSliding);
        main_loop.tick(t0 + ms(1000));
        assert_eq!(log.lock().unwrap().len(), 1);

        // ...but it stops the loop from re-arming
        assert_eq!(slider.state(), SlideState::AttachedIdle);
        main_loop.tick(t0 + ms(10_000));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn enable_then_start_resumes_from_idle() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (pager, log) = ProbePager::new();
        let slider = PageSlider::builder(main_loop.handle()).pager(pager).build();
        slider.set_adapter(Arc::new(FixedAdapter::new(5)));
        slider.on_attached();
        assert_eq!(slider.state(), SlideState::AttachedIdle);

        slider.set_auto_slide_enabled(true);
        slider.start_auto_slide();
        assert_eq!(slider.state(), SlideState::AttachedSliding);
        main_loop.tick(t0 + ms(4000));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn repeated_start_does_not_double_schedule() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 10);
        slider.on_attached();
        slider.start_auto_slide();
        slider.start_auto_slide();
        assert_eq!(main_loop.pending(), 1);

        main_loop.tick(t0 + ms(1000));
        main_loop.tick(t0 + ms(2000));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn start_while_detached_is_noop() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.start_auto_slide();
        assert_eq!(slider.state(), SlideState::Detached);
        main_loop.tick(t0 + ms(10_000));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn indicator_hidden_for_single_page() {
        for (pages, expected) in [(0, false), (1, false), (2, true), (5, true)] {
            let main_loop = MainLoop::new();
            let (indicator, bound, visible) = ProbeIndicator::new();
            let slider = PageSlider::builder(main_loop.handle())
                .pager(SimplePager::new())
                .indicator(indicator)
                .build();
            slider.set_adapter(Arc::new(FixedAdapter::new(pages)));
            assert!(*bound.lock().unwrap(), "pages: {pages}");
            assert_eq!(*visible.lock().unwrap(), Some(expected), "pages: {pages}");
        }
    }

    #[test]
    fn missing_indicator_is_tolerated() {
        let main_loop = MainLoop::new();
        let slider = PageSlider::builder(main_loop.handle())
            .pager(SimplePager::new())
            .build();
        slider.set_adapter(Arc::new(FixedAdapter::new(3)));
        assert_eq!(slider.current_page(), Some(0));
    }

    #[test]
    fn missing_pager_makes_operations_noops() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (indicator, bound, _visible) = ProbeIndicator::new();
        let slider = PageSlider::builder(main_loop.handle())
            .attrs(&auto_style(1000))
            .indicator(indicator)
            .build();

        // Indicator binding is skipped without a pager
        slider.set_adapter(Arc::new(FixedAdapter::new(3)));
        assert!(!*bound.lock().unwrap());
        assert_eq!(slider.current_page(), None);

        // The timer fires once, finds no pager, and stops itself
        slider.on_attached();
        main_loop.tick(t0 + ms(1000));
        assert_eq!(main_loop.pending(), 0);
    }

    #[test]
    fn dropped_slider_leaves_inert_callback() {
        let main_loop = MainLoop::new();
        let t0 = main_loop.now();
        let (slider, log) = sliding_fixture(&main_loop, 1000, 5);
        slider.on_attached();
        assert_eq!(main_loop.pending(), 1);

        drop(slider);
        // The pending task fires, fails to upgrade, and removes itself
        main_loop.tick(t0 + ms(1000));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(main_loop.pending(), 0);
    }
}
