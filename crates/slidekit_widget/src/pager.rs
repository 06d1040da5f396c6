//! Collaborator seams for the page slider
//!
//! The slider composes platform widgets it does not own. These traits are the
//! exact surface it depends on: a paged-scrolling container, its content
//! adapter, and a page-position indicator. Hosts implement them over their
//! real views; [`SimplePager`] is a minimal in-memory container for demos and
//! tests.

use std::sync::Arc;

use tracing::debug;

/// Content source for a paged container
///
/// The slider itself reads only the page count, to decide indicator
/// visibility.
pub trait PagerAdapter {
    fn count(&self) -> usize;
}

/// Adapter over a fixed number of pages
pub struct FixedAdapter {
    count: usize,
}

impl FixedAdapter {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl PagerAdapter for FixedAdapter {
    fn count(&self) -> usize {
        self.count
    }
}

/// A scrollable container showing one page at a time
///
/// What the container does when asked for an index past its last page is its
/// own business; the slider makes no promise there.
pub trait PagedView {
    fn set_adapter(&mut self, adapter: Arc<dyn PagerAdapter>);
    fn current_item(&self) -> usize;
    fn set_current_item(&mut self, index: usize, animated: bool);
}

/// Visual control showing the current page among the total
pub trait PageIndicator {
    /// Observe a pager for position changes
    fn bind(&mut self, pager: &dyn PagedView);
    fn set_visible(&mut self, visible: bool);
}

/// In-memory paged container
///
/// Clamps out-of-range selections to the last page, standing in for a real
/// container's native edge behavior.
#[derive(Default)]
pub struct SimplePager {
    adapter: Option<Arc<dyn PagerAdapter>>,
    current: usize,
}

impl SimplePager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.adapter.as_ref().map_or(0, |adapter| adapter.count())
    }
}

impl PagedView for SimplePager {
    fn set_adapter(&mut self, adapter: Arc<dyn PagerAdapter>) {
        self.adapter = Some(adapter);
        self.current = 0;
    }

    fn current_item(&self) -> usize {
        self.current
    }

    fn set_current_item(&mut self, index: usize, animated: bool) {
        let count = self.page_count();
        let clamped = if count == 0 { 0 } else { index.min(count - 1) };
        if clamped != self.current {
            debug!(from = self.current, to = clamped, animated, "page change");
        }
        self.current = clamped;
    }
}
