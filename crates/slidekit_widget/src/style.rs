//! Style attributes for the page slider
//!
//! Styling arrives as a flat string key/value bag ([`StyleAttrs`]), the shape
//! an inflater hands a widget after reading markup. [`SliderStyle`] gives the
//! bag its typed interpretation. Lookups are tolerant: a missing attribute
//! takes its default, a malformed one logs a warning and takes its default.
//! Nothing here returns an error to the caller.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::StyleError;

/// Attribute: height/width aspect ratio (float, must be > 0)
pub const ATTR_ASPECT_RATIO: &str = "aspectRatio";
/// Attribute: whether the slider auto-advances (bool)
pub const ATTR_AUTO_SLIDE: &str = "autoSlide";
/// Attribute: auto-advance interval in milliseconds (integer)
pub const ATTR_AUTO_SLIDE_DURATION: &str = "autoSlideDuration";
/// Attribute: layout identifier for the page indicator
pub const ATTR_INDICATOR_LAYOUT: &str = "pagerIndicatorLayout";

pub const DEFAULT_ASPECT_RATIO: f32 = 0.32;
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_millis(4000);
/// Built-in indicator layout used when no override is styled
pub const DEFAULT_INDICATOR_LAYOUT: &str = "slider_page_indicator";

/// Flat string attribute bag, as produced by markup inflation
#[derive(Debug, Clone, Default)]
pub struct StyleAttrs {
    values: FxHashMap<String, String>,
}

impl StyleAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(attr.into(), value.into());
        self
    }

    pub fn set(&mut self, attr: impl Into<String>, value: impl Into<String>) {
        self.values.insert(attr.into(), value.into());
    }

    pub fn get_str(&self, attr: &str) -> Option<&str> {
        self.values.get(attr).map(String::as_str)
    }

    /// Typed lookup: `Ok(None)` when absent, `Err` when present but malformed
    pub fn get_f32(&self, attr: &str) -> Result<Option<f32>, StyleError> {
        match self.values.get(attr) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                StyleError::InvalidFloat {
                    attr: attr.to_string(),
                    value: raw.clone(),
                }
            }),
        }
    }

    pub fn get_bool(&self, attr: &str) -> Result<Option<bool>, StyleError> {
        match self.values.get(attr) {
            None => Ok(None),
            Some(raw) => match raw.trim() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(StyleError::InvalidBool {
                    attr: attr.to_string(),
                    value: raw.clone(),
                }),
            },
        }
    }

    pub fn get_u64(&self, attr: &str) -> Result<Option<u64>, StyleError> {
        match self.values.get(attr) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                StyleError::InvalidInt {
                    attr: attr.to_string(),
                    value: raw.clone(),
                }
            }),
        }
    }
}

/// Resolved slider styling
///
/// Fixed at construction; only the auto-slide flag is toggleable later, and
/// that lives on the widget, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderStyle {
    /// Height = round(aspect_ratio * width)
    pub aspect_ratio: f32,
    /// Whether auto-advance starts on attach
    pub auto_slide: bool,
    /// Delay between auto-advances
    pub interval: Duration,
    /// Layout identifier the host resolves to an indicator view
    pub indicator_layout: String,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            auto_slide: false,
            interval: DEFAULT_SLIDE_INTERVAL,
            indicator_layout: DEFAULT_INDICATOR_LAYOUT.to_string(),
        }
    }
}

impl SliderStyle {
    /// Resolve a style from an attribute bag
    ///
    /// Missing attributes take defaults silently. Malformed values and
    /// non-positive aspect ratios are logged and replaced by defaults.
    pub fn from_attrs(attrs: &StyleAttrs) -> Self {
        let mut style = Self::default();

        match attrs.get_f32(ATTR_ASPECT_RATIO) {
            Ok(Some(ratio)) if ratio > 0.0 && ratio.is_finite() => style.aspect_ratio = ratio,
            Ok(Some(ratio)) => {
                warn!(ratio, "ignoring non-positive aspect ratio");
            }
            Ok(None) => {}
            Err(err) => warn!(%err, "ignoring malformed aspect ratio"),
        }

        match attrs.get_bool(ATTR_AUTO_SLIDE) {
            Ok(Some(enabled)) => style.auto_slide = enabled,
            Ok(None) => {}
            Err(err) => warn!(%err, "ignoring malformed auto-slide flag"),
        }

        match attrs.get_u64(ATTR_AUTO_SLIDE_DURATION) {
            Ok(Some(millis)) => style.interval = Duration::from_millis(millis),
            Ok(None) => {}
            Err(err) => warn!(%err, "ignoring malformed auto-slide duration"),
        }

        if let Some(layout) = attrs.get_str(ATTR_INDICATOR_LAYOUT) {
            style.indicator_layout = layout.to_string();
        }

        style
    }
}
