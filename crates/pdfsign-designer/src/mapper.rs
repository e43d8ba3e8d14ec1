//! Coordinate mapping between canvas space and document space.
//!
//! Canvas coordinates are pixels on the rendered page (0,0 at top-left).
//! Document coordinates are PDF points on the native page (0,0 at bottom-left).
//!
//! The transformation accounts for:
//! - Independent X and Y scale (renderer and native page may disagree on aspect)
//! - Y-axis flip (screen Y down vs PDF Y up)
//! - The overlay's own height, so the box's bottom edge lands on the right Y
//!
//! Formula:
//! ```text
//! scale_x = native_width / rendered_width
//! scale_y = native_height / rendered_height
//! doc_x   = canvas_x * scale_x
//! doc_y   = native_height - (canvas_y * scale_y + canvas_height * scale_y)
//! ```

use std::fmt;

use pdfsign_core::{Dimensions, DocumentRect, OverlayState, PageViewport, Position, Result};

/// A validated pairing of one rendered page with its native point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMapping {
    scale_x: f64,
    scale_y: f64,
    native: Dimensions,
}

impl PageMapping {
    /// Creates a mapping, failing with `InvalidDimensions` on any non-positive side.
    pub fn new(rendered_page: &PageViewport, native_page_size: &Dimensions) -> Result<Self> {
        let rendered = rendered_page.dimensions().validated("rendered page")?;
        let native = native_page_size.validated("native page size")?;
        Ok(Self {
            scale_x: native.width / rendered.width,
            scale_y: native.height / rendered.height,
            native,
        })
    }

    /// Points per canvas pixel along X.
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Points per canvas pixel along Y.
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn native_size(&self) -> Dimensions {
        self.native
    }

    /// Converts an overlay box from canvas space to document space.
    pub fn canvas_to_document(&self, overlay: &OverlayState) -> Result<DocumentRect> {
        let size = overlay.size.validated("overlay")?;
        let doc_width = size.width * self.scale_x;
        let doc_height = size.height * self.scale_y;
        let doc_x = overlay.position.x * self.scale_x;
        // Flip Y: the box's top edge in canvas space becomes its bottom edge in PDF space
        let doc_y = self.native.height - (overlay.position.y * self.scale_y + doc_height);
        Ok(DocumentRect::new(doc_x, doc_y, doc_width, doc_height))
    }

    /// Converts a document-space rectangle back to a canvas-space overlay box.
    pub fn document_to_canvas(&self, rect: &DocumentRect) -> Result<OverlayState> {
        let size = rect.size().validated("document rect")?;
        let width = size.width / self.scale_x;
        let height = size.height / self.scale_y;
        let x = rect.x / self.scale_x;
        let y = (self.native.height - rect.y - size.height) / self.scale_y;
        Ok(OverlayState::new(
            Position::new(x, y),
            Dimensions::new(width, height),
        ))
    }
}

impl fmt::Display for PageMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scale: ({:.4}, {:.4}) pt/px | Page: {} pt",
            self.scale_x, self.scale_y, self.native
        )
    }
}

/// Maps an overlay on a rendered page into PDF point space.
///
/// Pure and deterministic; fails with `InvalidDimensions` if any input
/// dimension is zero, negative, or not finite.
pub fn to_document_space(
    overlay: &OverlayState,
    rendered_page: &PageViewport,
    native_page_size: &Dimensions,
) -> Result<DocumentRect> {
    PageMapping::new(rendered_page, native_page_size)?.canvas_to_document(overlay)
}

/// Inverse of [`to_document_space`].
pub fn to_canvas_space(
    rect: &DocumentRect,
    rendered_page: &PageViewport,
    native_page_size: &Dimensions,
) -> Result<OverlayState> {
    PageMapping::new(rendered_page, native_page_size)?.document_to_canvas(rect)
}

/// Render scale that makes a page of `native_width` points fill `container_width` pixels.
pub fn fit_scale(container_width: f64, native_width: f64) -> Result<f64> {
    Dimensions::new(container_width, native_width).validated("fit-to-width")?;
    Ok(container_width / native_width)
}
