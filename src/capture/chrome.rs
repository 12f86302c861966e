//! Headless-Chrome snapshot provider (uses the `headless_chrome` crate)
//!
//! This adapter launches a headless Chrome instance, navigates a single tab
//! to the page hosting the panel, and captures clipped element screenshots
//! on demand. The region identifier is interpreted as a CSS selector.

use crate::bitmap::Bitmap;
use crate::capture::{CaptureOptions, SnapshotProvider};
use crate::error::{Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the Chrome-backed provider.
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Browser window size; the panel may be taller than this, the clipped
    /// capture is taken from the surface rather than the visible viewport.
    pub window_width: u32,
    pub window_height: u32,
    /// Milliseconds to wait for navigation to settle
    pub nav_timeout_ms: u64,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            nav_timeout_ms: 30000,
        }
    }
}

/// Snapshot provider backed by a headless Chrome tab.
pub struct ChromeSnapshotProvider {
    browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSnapshotProvider {
    /// Launch a headless browser and navigate to `url`.
    pub fn open(url: &str, config: ChromeConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| {
                Error::CaptureFailure(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::CaptureFailure(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::CaptureFailure(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.nav_timeout_ms));

        tab.navigate_to(url)
            .map_err(|e| Error::CaptureFailure(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::CaptureFailure(format!("Wait for navigation failed: {}", e)))?;

        // Give late-arriving images and fonts a moment to settle
        std::thread::sleep(Duration::from_millis(500));

        Ok(Self { browser, tab })
    }

    /// Close the provider and terminate the browser process promptly.
    pub fn close(self) {
        drop(self.tab);
        drop(self.browser);
    }

    fn force_background(&self, selector: &str, color: crate::Color) {
        let script = format!(
            "document.querySelector({:?}).style.backgroundColor = 'rgb({}, {}, {})'",
            selector, color.r, color.g, color.b
        );
        // Non-fatal: a transparent panel still captures, just without the
        // forced fill.
        if let Err(e) = self.tab.evaluate(&script, false) {
            warn!("Failed to force background on {}: {}", selector, e);
        }
    }
}

impl SnapshotProvider for ChromeSnapshotProvider {
    fn capture(&mut self, region: &str, opts: &CaptureOptions) -> Result<Bitmap> {
        let element = self
            .tab
            .find_element(region)
            .map_err(|e| Error::CaptureFailure(format!("Region {:?} not found: {}", region, e)))?;

        element.scroll_into_view().map_err(|e| {
            Error::CaptureFailure(format!("Failed to scroll {:?} into view: {}", region, e))
        })?;

        self.force_background(region, opts.background);

        let model = element.get_box_model().map_err(|e| {
            Error::CaptureFailure(format!("Failed to read box model of {:?}: {}", region, e))
        })?;

        let clip = Page::Viewport {
            x: model.content.top_left.x,
            y: model.content.top_left.y,
            width: model.content.width(),
            height: model.content.height(),
            scale: opts.resolution_multiplier,
        };

        // CDP screenshots rasterize cross-origin content without tainting,
        // so `capture_cross_origin` needs no special handling here.
        let png = self
            .tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| Error::CaptureFailure(format!("Screenshot failed: {}", e)))?;

        Bitmap::from_png_bytes(&png)
    }
}
