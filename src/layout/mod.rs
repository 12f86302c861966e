//! Page geometry, fit selection and pagination
//!
//! Everything in this module is pure: placement plans are a function of
//! (bitmap dimensions, export configuration) and nothing else, so planning
//! the same export twice yields an identical instruction sequence.

pub mod fit;
pub mod geometry;
pub mod tile;

pub use geometry::printable_area;

use crate::error::{Error, Result};
use crate::ExportConfig;
use serde::{Deserialize, Serialize};

/// Page dimensions minus margins on all sides, plus the resolved margins.
/// Both axes are strictly positive by construction (`printable_area` fails
/// fast otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintableArea {
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl PrintableArea {
    /// Width-to-height ratio of the printable area.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// The part of the source bitmap a placement draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRegion {
    /// The entire bitmap
    Whole,
    /// A sub-rectangle in source pixels
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// One page worth of placement: which part of the bitmap is drawn, where on
/// the page (top-left-origin millimetres), and whether a page break precedes
/// it. Instructions are ordered; their order is the physical page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstruction {
    pub region: ImageRegion,
    pub dest_x: f64,
    pub dest_y: f64,
    pub dest_width: f64,
    pub dest_height: f64,
    /// `false` only for the first page
    pub page_break: bool,
}

/// Compute the full placement plan for a bitmap under the given export
/// configuration. Geometry errors surface here, before any capture data is
/// touched by the writer.
pub fn plan_placements(
    bitmap_width: u32,
    bitmap_height: u32,
    config: &ExportConfig,
) -> Result<Vec<PlacementInstruction>> {
    config.validate()?;
    if bitmap_width == 0 || bitmap_height == 0 {
        return Err(Error::CaptureFailure(format!(
            "Captured bitmap has a zero dimension: {}x{}",
            bitmap_width, bitmap_height
        )));
    }
    let area = geometry::printable_area(&config.page_size, &config.margins)?;
    match config.mode {
        crate::LayoutMode::FitOnePage => {
            Ok(vec![fit::plan_fit(bitmap_width, bitmap_height, &area)])
        }
        crate::LayoutMode::TileAcrossPages => {
            Ok(tile::plan_tiled(bitmap_width, bitmap_height, &area))
        }
    }
}
