//! Document writer boundary
//!
//! The core never inspects document internals; it sequences image
//! placements in page order through the `DocumentWriter` trait and calls
//! `finalize` once, which is the only operation with externally observable
//! output. `PdfWriter` is the shipped implementation, built on `printpdf`.

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::PageSize;
use printpdf::{
    ColorBits, ColorSpace, ImageTransform, ImageXObject, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Px,
};
use std::io::{BufWriter, Cursor};

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Boundary trait for paginated document writers.
///
/// Placement coordinates are top-left-origin millimetres on the page.
/// Implementations mutate an in-memory handle only; nothing is observable
/// until `finalize`.
pub trait DocumentWriter {
    /// Place `slice` at the given destination rectangle, optionally starting
    /// a new page first. The first placement of a document must pass
    /// `add_page_break_first = false`.
    fn add_image_page(
        &mut self,
        slice: &Bitmap,
        dest_x: f64,
        dest_y: f64,
        dest_width: f64,
        dest_height: f64,
        add_page_break_first: bool,
    ) -> Result<()>;

    /// Assemble the final document bytes, consuming the writer.
    fn finalize(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// PDF writer backed by `printpdf`.
///
/// `printpdf` uses bottom-left-origin coordinates; this adapter converts
/// from the engine's top-left convention internally.
pub struct PdfWriter {
    doc: PdfDocumentReference,
    current_layer: PdfLayerReference,
    page_size: PageSize,
    pages: usize,
}

impl PdfWriter {
    /// Create a writer for documents of the given page size. The document
    /// starts with one empty page, matching the convention that the first
    /// placement carries no page break.
    pub fn new(page_size: PageSize, title: &str) -> Self {
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(page_size.width as f32),
            Mm(page_size.height as f32),
            "Layer 1",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);
        Self {
            doc,
            current_layer,
            page_size,
            pages: 1,
        }
    }

    /// Number of physical pages in the document so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }
}

impl DocumentWriter for PdfWriter {
    fn add_image_page(
        &mut self,
        slice: &Bitmap,
        dest_x: f64,
        dest_y: f64,
        dest_width: f64,
        dest_height: f64,
        add_page_break_first: bool,
    ) -> Result<()> {
        if add_page_break_first {
            let (page, layer) = self.doc.add_page(
                Mm(self.page_size.width as f32),
                Mm(self.page_size.height as f32),
                "Layer 1",
            );
            self.current_layer = self.doc.get_page(page).get_layer(layer);
            self.pages += 1;
        }

        let px_width = slice.width();
        let px_height = slice.height();
        if px_width == 0 || px_height == 0 {
            return Err(Error::WriteFailure(format!(
                "Refusing to place empty image slice {}x{}",
                px_width, px_height
            )));
        }

        let image = printpdf::Image::from(ImageXObject {
            width: Px(px_width as usize),
            height: Px(px_height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: slice.rgb8_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // Top-left-origin mm to bottom-left-origin mm
        let pdf_y = self.page_size.height - dest_y - dest_height;

        // At 72 dpi one source pixel maps to one point, so the scale factors
        // are simply target-points over source-pixels.
        let scale_x = dest_width as f32 * MM_TO_PT / px_width as f32;
        let scale_y = dest_height as f32 * MM_TO_PT / px_height as f32;

        image.add_to_layer(
            self.current_layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(dest_x as f32)),
                translate_y: Some(Mm(pdf_y as f32)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(72.0),
                ..Default::default()
            },
        );

        Ok(())
    }

    fn finalize(self) -> Result<Vec<u8>> {
        let PdfWriter {
            doc, current_layer, ..
        } = self;
        // Release the layer handle before the document is consumed
        drop(current_layer);

        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = BufWriter::new(cursor);
            doc.save(&mut writer)
                .map_err(|e| Error::WriteFailure(format!("Failed to assemble PDF: {}", e)))?;
        }
        Ok(buf)
    }
}
