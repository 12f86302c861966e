//! Printable-area math

use crate::error::{Error, Result};
use crate::layout::PrintableArea;
use crate::{MarginPolicy, PageSize};

/// Resolve a margin policy into absolute per-axis margins in millimetres.
fn resolve_margins(page: &PageSize, policy: &MarginPolicy) -> (f64, f64) {
    match *policy {
        MarginPolicy::Fixed { x, y } => (x, y),
        MarginPolicy::Ratio(r) => (page.width * r, page.height * r),
    }
}

/// Compute the printable area of a page under a margin policy.
///
/// Margins must be non-negative and strictly less than half of each
/// corresponding page dimension; otherwise the printable area would collapse
/// to zero or below, which is a configuration defect and fails with
/// `InvalidGeometry` rather than being clamped.
pub fn printable_area(page: &PageSize, policy: &MarginPolicy) -> Result<PrintableArea> {
    if page.width <= 0.0 || page.height <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "Page dimensions must be positive: {}x{}",
            page.width, page.height
        )));
    }

    let (margin_x, margin_y) = resolve_margins(page, policy);
    if margin_x < 0.0 || margin_y < 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "Margins must be non-negative: {}x{}",
            margin_x, margin_y
        )));
    }
    if margin_x >= page.width / 2.0 || margin_y >= page.height / 2.0 {
        return Err(Error::InvalidGeometry(format!(
            "Margins {}x{} consume the whole {}x{} page",
            margin_x, margin_y, page.width, page.height
        )));
    }

    Ok(PrintableArea {
        width: page.width - 2.0 * margin_x,
        height: page.height - 2.0 * margin_y,
        margin_x,
        margin_y,
    })
}
