//! Fit-one-page layout strategy
//!
//! The whole bitmap is scaled to occupy a single page's printable area,
//! preserving aspect ratio. Content is shrunk, never cropped: a very tall
//! panel becomes a narrow column rather than spilling onto a second page.

use crate::layout::{ImageRegion, PlacementInstruction, PrintableArea};

/// Select the final box for a bitmap within a printable area.
///
/// The bitmap's aspect ratio is compared against the printable area's: a
/// relatively taller bitmap is constrained by height, anything else by
/// width. The result fits inside the area on both axes and exactly reaches
/// the bound on the binding axis.
pub fn select_fit(
    bitmap_width: f64,
    bitmap_height: f64,
    printable_width: f64,
    printable_height: f64,
) -> (f64, f64) {
    let bitmap_aspect = bitmap_width / bitmap_height;
    let printable_aspect = printable_width / printable_height;

    if bitmap_aspect < printable_aspect {
        // Taller than the area: height binds
        let final_height = printable_height;
        (final_height * bitmap_aspect, final_height)
    } else {
        // Wider (or equal): width binds
        let final_width = printable_width;
        (final_width, final_width / bitmap_aspect)
    }
}

/// Plan the single placement for fit-one-page mode.
///
/// The binding axis sits flush to the margin; slack on the non-binding axis
/// is split evenly, giving a top-anchored, horizontally-centered placement
/// for tall panels and a left-anchored, vertically-centered one for wide
/// panels.
pub fn plan_fit(bitmap_width: u32, bitmap_height: u32, area: &PrintableArea) -> PlacementInstruction {
    let (final_width, final_height) =
        select_fit(bitmap_width as f64, bitmap_height as f64, area.width, area.height);

    let dest_x = area.margin_x + (area.width - final_width) / 2.0;
    let dest_y = area.margin_y + (area.height - final_height) / 2.0;

    PlacementInstruction {
        region: ImageRegion::Whole,
        dest_x,
        dest_y,
        dest_width: final_width,
        dest_height: final_height,
        page_break: false,
    }
}
