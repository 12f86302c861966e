//! Tile-across-pages layout strategy
//!
//! Preserves near-native resolution by splitting the bitmap into successive
//! same-width strips, each placed on its own page at the full printable
//! width. The last strip may be shorter.

use crate::layout::{ImageRegion, PlacementInstruction, PrintableArea};

/// Plan the placement sequence for tile-across-pages mode.
///
/// Every page uses the full printable width, so `scale` source pixels map
/// onto one millimetre. Source slice boundaries are cumulative rounded
/// positions with the final boundary pinned to the bitmap height, so
/// consecutive slices partition the bitmap exactly — no gap, no overlap,
/// no trailing blank page when the content height is an exact multiple of
/// the page height.
pub fn plan_tiled(
    bitmap_width: u32,
    bitmap_height: u32,
    area: &PrintableArea,
) -> Vec<PlacementInstruction> {
    // Source pixels per destination millimetre
    let scale = bitmap_width as f64 / area.width;
    let total_dest_height = bitmap_height as f64 / scale;

    let mut pages = Vec::new();
    let mut remaining = total_dest_height;
    let mut consumed = 0.0_f64;
    let mut src_cursor = 0u32;

    // Termination must be `> 0.0`, not `>= 0.0`: when the content height is
    // an exact multiple of the page height the final subtraction lands on
    // zero and the loop must not emit a blank page.
    while remaining > 0.0 {
        let dest_height = remaining.min(area.height);
        consumed += dest_height;

        let src_end = if remaining <= area.height {
            bitmap_height
        } else {
            ((consumed * scale).round() as u32).min(bitmap_height)
        };
        let src_height = src_end - src_cursor;
        // Rounding can exhaust the source rows while a sub-pixel sliver of
        // destination height is still outstanding; there is nothing left to
        // draw for it.
        if src_height == 0 {
            break;
        }

        pages.push(PlacementInstruction {
            region: ImageRegion::Crop {
                x: 0,
                y: src_cursor,
                width: bitmap_width,
                height: src_height,
            },
            dest_x: area.margin_x,
            dest_y: area.margin_y,
            dest_width: area.width,
            dest_height,
            page_break: !pages.is_empty(),
        });

        src_cursor = src_end;
        remaining -= dest_height;
    }

    pages
}
