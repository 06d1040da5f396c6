//! Auto-sliding page carousel widget
//!
//! A thin composition over a paged-scrolling container and a page indicator:
//! the widget owns sizing policy (fixed aspect ratio against the offered
//! width) and the timer-driven auto-advance loop tied to its attach/detach
//! lifecycle. Everything else is delegated to collaborators behind the traits
//! in [`pager`].
//!
//! See [`slider::PageSlider`] for the main entry point.

pub mod error;
pub mod pager;
pub mod slider;
pub mod style;

pub use error::StyleError;
pub use pager::{FixedAdapter, PageIndicator, PagedView, PagerAdapter, SimplePager};
pub use slider::{PageSlider, PageSliderBuilder, Size, SlideState};
pub use style::{SliderStyle, StyleAttrs};

/// Convenience re-exports for widget users
pub mod prelude {
    pub use crate::pager::{FixedAdapter, PageIndicator, PagedView, PagerAdapter, SimplePager};
    pub use crate::slider::{PageSlider, PageSliderBuilder, Size, SlideState};
    pub use crate::style::{
        SliderStyle, StyleAttrs, ATTR_ASPECT_RATIO, ATTR_AUTO_SLIDE, ATTR_AUTO_SLIDE_DURATION,
        ATTR_INDICATOR_LAYOUT,
    };
}
