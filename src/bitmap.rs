//! Immutable raster bitmaps produced by snapshot providers
//!
//! A `Bitmap` is created once per export, owned exclusively by that export,
//! and discarded after the document is finalized. There is deliberately no
//! caching across exports: the source panel is mutable between exports and
//! a fresh capture must reflect current edits.

use crate::error::{Error, Result};
use crate::layout::ImageRegion;
use base64::Engine as Base64Engine;
use image::RgbaImage;

/// An immutable RGBA raster image in source pixels.
#[derive(Debug, Clone)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Wrap an already-decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode encoded image bytes (PNG or JPEG; the format is sniffed).
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::io::Reader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| Error::CaptureFailure(format!("Failed to sniff image format: {}", e)))?
            .decode()
            .map_err(|e| Error::CaptureFailure(format!("Failed to decode image: {}", e)))?;
        Ok(Self {
            image: decoded.to_rgba8(),
        })
    }

    /// Decode a `data:image/...;base64,` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| Error::CaptureFailure("Invalid data URI".to_string()))?;
        if !header.contains("base64") {
            return Err(Error::CaptureFailure(
                "Only base64 data URIs are supported".to_string(),
            ));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::CaptureFailure(format!("Base64 decode failed: {}", e)))?;
        Self::from_png_bytes(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width-to-height ratio of the source pixels.
    pub fn aspect(&self) -> f64 {
        self.image.width() as f64 / self.image.height() as f64
    }

    /// Materialize the sub-bitmap covered by `region`.
    ///
    /// Document-writer image primitives place whole images only, so tile
    /// slices must be cropped out before placement. `ImageRegion::Whole`
    /// returns a clone of the full bitmap.
    pub fn crop(&self, region: &ImageRegion) -> Result<Bitmap> {
        match region {
            ImageRegion::Whole => Ok(self.clone()),
            ImageRegion::Crop {
                x,
                y,
                width,
                height,
            } => {
                if x + width > self.width() || y + height > self.height() {
                    return Err(Error::Other(format!(
                        "Crop region {}x{}+{}+{} exceeds bitmap {}x{}",
                        width,
                        height,
                        x,
                        y,
                        self.width(),
                        self.height()
                    )));
                }
                let view = image::imageops::crop_imm(&self.image, *x, *y, *width, *height);
                Ok(Bitmap::from_rgba(view.to_image()))
            }
        }
    }

    /// Raw interleaved RGB8 pixel data, alpha dropped.
    pub fn rgb8_raw(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.image.pixels().len() * 3);
        for px in self.image.pixels() {
            out.extend_from_slice(&px.0[..3]);
        }
        out
    }
}
