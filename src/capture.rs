//! Snapshot providers: the capture boundary of the export pipeline
//!
//! A provider turns a stable region identifier into a single raster bitmap
//! reflecting the region's current visual state. Providers are adapters;
//! the engine never mutates the source panel and never caches bitmaps
//! across exports.
//!
//! Two providers ship unconditionally: `StaticProvider` (a preset bitmap,
//! useful for tests and for embedders that already hold a raster) and
//! `PngFileProvider` (region identifier is a file path or base64 data URI).
//! A headless-Chrome provider lives in [`chrome`] behind the `cdp` feature.

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::Color;

#[cfg(feature = "cdp")]
pub mod chrome;

/// Capture-stage options, derived from the export configuration.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Device-pixel multiplier applied at capture time (>= 1.0)
    pub resolution_multiplier: f64,
    /// Treat cross-origin embedded images as capturable. Advisory for
    /// backends whose rasterizer is not tainted by cross-origin content.
    pub capture_cross_origin: bool,
    /// Solid background forced behind the region
    pub background: Color,
}

/// Core trait for snapshot provider implementations.
///
/// `capture` may block (a real renderer needs time to rasterize); callers
/// that need a bound on a stalled provider should go through the async
/// exporter, which supports a timeout.
pub trait SnapshotProvider: Send {
    /// Produce a bitmap for the region identified by `region`.
    fn capture(&mut self, region: &str, opts: &CaptureOptions) -> Result<Bitmap>;
}

/// A provider that returns a clone of a preset bitmap for any region.
///
/// Used by unit and pipeline tests, and by embedders whose rendering layer
/// already produced a raster.
pub struct StaticProvider {
    bitmap: Bitmap,
}

impl StaticProvider {
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }
}

impl SnapshotProvider for StaticProvider {
    fn capture(&mut self, _region: &str, _opts: &CaptureOptions) -> Result<Bitmap> {
        Ok(self.bitmap.clone())
    }
}

/// A provider that treats the region identifier as an encoded image source:
/// either a filesystem path to a PNG/JPEG or a `data:image/...;base64,` URI.
pub struct PngFileProvider;

impl PngFileProvider {
    pub fn new() -> Self {
        PngFileProvider
    }
}

impl Default for PngFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for PngFileProvider {
    fn capture(&mut self, region: &str, _opts: &CaptureOptions) -> Result<Bitmap> {
        if region.starts_with("data:") {
            return Bitmap::from_data_uri(region);
        }
        let bytes = std::fs::read(region)
            .map_err(|e| Error::CaptureFailure(format!("Failed to read {}: {}", region, e)))?;
        Bitmap::from_png_bytes(&bytes)
    }
}
