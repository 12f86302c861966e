//! Panelpress
//!
//! An export engine that captures a rendered on-screen panel as a raster
//! bitmap and lays it out onto fixed-size printable pages, producing a
//! single paginated PDF.
//!
//! # Features
//!
//! - **Pluggable capture**: snapshot providers are adapters; a static
//!   in-memory provider and a PNG-file provider ship by default, and a
//!   headless-Chrome provider is available behind the `cdp` feature
//! - **Two layout modes**: shrink the whole bitmap onto one page, or tile
//!   it across successive same-width pages at near-native resolution
//! - **Fail-fast geometry**: margin configurations that collapse the
//!   printable area are rejected before any capture is attempted
//!
//! # Example
//!
//! ```no_run
//! use panelpress::{export_panel, ExportConfig, LayoutMode, StaticProvider, Bitmap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bitmap = Bitmap::from_png_bytes(&std::fs::read("panel.png")?)?;
//! let mut provider = StaticProvider::new(bitmap);
//!
//! let config = ExportConfig {
//!     mode: LayoutMode::TileAcrossPages,
//!     ..Default::default()
//! };
//!
//! let doc = export_panel(&mut provider, &config)?;
//! std::fs::write("panel.pdf", &doc.bytes)?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod bitmap;
pub use bitmap::Bitmap;

// Snapshot providers (capture boundary)
pub mod capture;
pub use capture::{CaptureOptions, PngFileProvider, SnapshotProvider, StaticProvider};

#[cfg(feature = "cdp")]
pub use capture::chrome::ChromeSnapshotProvider;

// Page geometry, fit selection and pagination
pub mod layout;
pub use layout::{plan_placements, ImageRegion, PlacementInstruction, PrintableArea};

// Document writer boundary
pub mod writer;
pub use writer::{DocumentWriter, PdfWriter};

// Export orchestration
pub mod exporter;
pub use exporter::{export_panel, ExportedDocument, Exporter};

/// Named physical page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };

    /// US Letter portrait
    pub const LETTER: PageSize = PageSize {
        width: 215.9,
        height: 279.4,
    };

    /// Parse a page size from a name (`a4`, `letter`) or a `WxH` string in
    /// millimetres (e.g. `210x297`).
    pub fn parse(s: &str) -> Result<PageSize> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => return Ok(PageSize::A4),
            "letter" => return Ok(PageSize::LETTER),
            _ => {}
        }
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::ConfigError(format!("Unrecognized page size: {}", s)))?;
        let width: f64 = w
            .trim()
            .parse()
            .map_err(|_| Error::ConfigError(format!("Invalid page width: {}", w)))?;
        let height: f64 = h
            .trim()
            .parse()
            .map_err(|_| Error::ConfigError(format!("Invalid page height: {}", h)))?;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Page dimensions must be positive: {}x{}",
                width, height
            )));
        }
        Ok(PageSize { width, height })
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Margin policy, resolved once into absolute margins before layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarginPolicy {
    /// Fixed margins in the page unit (millimetres)
    Fixed { x: f64, y: f64 },
    /// Margin as a ratio of each page dimension (e.g. 0.1 for 10%)
    Ratio(f64),
}

impl Default for MarginPolicy {
    fn default() -> Self {
        MarginPolicy::Fixed { x: 10.0, y: 10.0 }
    }
}

/// How the captured bitmap is laid out onto pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Scale the whole bitmap down (never up past the printable area) so it
    /// occupies exactly one page, preserving aspect ratio.
    FitOnePage,
    /// Split the bitmap into successive page-height strips, each becoming
    /// its own page at the printable width.
    TileAcrossPages,
}

/// An opaque RGB color used for forced-background capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Configuration for a single export.
///
/// Everything the engine needs is carried here explicitly; the engine holds
/// no state of its own between exports. The defaults capture at native
/// resolution onto A4 with 10mm margins, fitting the whole panel onto one
/// page.
///
/// # Examples
///
/// ```
/// let cfg = panelpress::ExportConfig::default();
/// assert_eq!(cfg.page_size, panelpress::PageSize::A4);
/// assert!(cfg.timeout_ms.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Stable identifier of the region to capture. Interpretation is
    /// provider-specific: a CSS selector for the Chrome provider, a file
    /// path or data URI for the PNG-file provider.
    pub region: String,
    /// Capture resolution multiplier (>= 1.0)
    pub resolution_multiplier: f64,
    /// Whether the provider should treat cross-origin embedded images as
    /// capturable. Advisory for backends whose rasterizer is not tainted
    /// by cross-origin content.
    pub capture_cross_origin: bool,
    /// Solid background forced behind the captured region
    pub background: Color,
    /// Physical page dimensions
    pub page_size: PageSize,
    /// Margin policy, resolved against `page_size`
    pub margins: MarginPolicy,
    /// Layout strategy
    pub mode: LayoutMode,
    /// Optional overall export timeout in milliseconds. `None` waits
    /// indefinitely on a stalled provider.
    pub timeout_ms: Option<u64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            resolution_multiplier: 1.0,
            capture_cross_origin: true,
            background: Color::WHITE,
            page_size: PageSize::A4,
            margins: MarginPolicy::default(),
            mode: LayoutMode::FitOnePage,
            timeout_ms: None,
        }
    }
}

impl ExportConfig {
    /// Validate the parts of the configuration that do not depend on the
    /// captured bitmap. Geometry is checked separately (and again before
    /// any capture) by `layout::printable_area`.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution_multiplier.is_finite() || self.resolution_multiplier < 1.0 {
            return Err(Error::ConfigError(format!(
                "Resolution multiplier must be >= 1.0, got {}",
                self.resolution_multiplier
            )));
        }
        if self.page_size.width <= 0.0 || self.page_size.height <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Page dimensions must be positive: {}x{}",
                self.page_size.width, self.page_size.height
            )));
        }
        Ok(())
    }

    /// The capture-stage slice of this configuration.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            resolution_multiplier: self.resolution_multiplier,
            capture_cross_origin: self.capture_cross_origin,
            background: self.background,
        }
    }
}
