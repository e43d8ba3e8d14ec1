//! Renderer interface
//!
//! Parses a source document and rasterizes one page at a time for the
//! placement workspace.

use async_trait::async_trait;
use pdfsign_core::{Dimensions, PageViewport};

use crate::error::RenderError;

/// RGBA8 pixel buffer of one rendered page, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRaster {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PageRaster {
    /// RGBA value at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        self.rgba
            .get(offset..offset + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Result of rendering a page: the pixels plus the viewport they were drawn at.
///
/// The viewport is the clamping bound for the overlay and the rendered size
/// the coordinate mapper divides by.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub raster: PageRaster,
    pub viewport: PageViewport,
}

/// Renderer trait
///
/// Implement this for a PDF engine. The session awaits `load` and
/// `render_page` on a single thread, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait Renderer {
    /// Parsed document handle.
    type Handle;

    /// Parses `bytes` into a document handle.
    async fn load(&self, bytes: &[u8]) -> Result<Self::Handle, RenderError>;

    /// Number of pages in the document.
    fn page_count(&self, handle: &Self::Handle) -> u32;

    /// Renders the page at 0-based `page_index` at `scale` pixels per point.
    async fn render_page(
        &self,
        handle: &Self::Handle,
        page_index: u32,
        scale: f64,
    ) -> Result<RenderedPage, RenderError>;

    /// Intrinsic size of the page in PDF points.
    fn native_page_size(&self, handle: &Self::Handle, page_index: u32) -> Result<Dimensions, RenderError>;
}
