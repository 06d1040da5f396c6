//! Console demo for the page slider
//!
//! Wires a `PageSlider` to an in-memory pager and a logging indicator, then
//! pumps the UI loop over simulated time so the auto-slide behavior is
//! visible without a windowing host. Run with `RUST_LOG=debug` for the
//! scheduling trace.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slidekit_core::MainLoop;
use slidekit_widget::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "slidekit-demo", about = "Auto-sliding carousel demo")]
struct Args {
    /// Number of pages in the carousel
    #[arg(long, default_value_t = 5)]
    pages: usize,

    /// Auto-slide interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Height/width aspect ratio
    #[arg(long, default_value_t = 0.32)]
    ratio: f32,

    /// How much simulated time to run, in milliseconds
    #[arg(long, default_value_t = 5500)]
    run_for_ms: u64,

    /// Layout width offered to the widget, in pixels
    #[arg(long, default_value_t = 360.0)]
    width: f32,
}

/// Indicator that reports its state to the log
struct LogIndicator;

impl PageIndicator for LogIndicator {
    fn bind(&mut self, pager: &dyn PagedView) {
        info!(page = pager.current_item(), "indicator bound to pager");
    }

    fn set_visible(&mut self, visible: bool) {
        info!(visible, "indicator visibility");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let main_loop = MainLoop::new();
    let attrs = StyleAttrs::new()
        .with(ATTR_ASPECT_RATIO, args.ratio.to_string())
        .with(ATTR_AUTO_SLIDE, "true")
        .with(ATTR_AUTO_SLIDE_DURATION, args.interval_ms.to_string());

    let slider = PageSlider::builder(main_loop.handle())
        .attrs(&attrs)
        .pager(SimplePager::new())
        .indicator(LogIndicator)
        .build();

    slider.set_adapter(Arc::new(FixedAdapter::new(args.pages)));

    let size = slider.measure(args.width);
    info!(width = size.width, height = size.height, "measured");

    slider.on_attached();
    info!(state = ?slider.state(), "attached");

    // Pump the loop in 100ms steps of simulated time, like a frame loop
    let t0 = main_loop.now();
    let mut last_page = slider.current_page();
    let mut t = 0;
    while t <= args.run_for_ms {
        main_loop.tick(t0 + Duration::from_millis(t));
        let page = slider.current_page();
        if page != last_page {
            info!(t_ms = t, ?page, "page advanced");
            last_page = page;
        }
        t += 100;
    }

    slider.on_detached();
    info!(state = ?slider.state(), pending = main_loop.pending(), "detached");
    Ok(())
}
