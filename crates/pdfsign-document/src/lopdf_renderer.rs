//! lopdf-backed renderer.
//!
//! lopdf parses the page tree but does not rasterize content, so this
//! renderer produces page geometry with a blank white raster. It is
//! enough to drive placement headlessly; a UI host plugs in a real
//! rasterizer behind the same [`Renderer`] trait.

use async_trait::async_trait;
use lopdf::{Document, ObjectId};
use pdfsign_core::{Dimensions, PageViewport};
use tiny_skia::{Color, Pixmap};
use tracing::{debug, info};

use crate::error::RenderError;
use crate::page_tree::{self, PageBox};
use crate::renderer::{PageRaster, RenderedPage, Renderer};

/// A parsed document plus its page ids in page order.
pub struct PdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfDocument {
    /// Parses `bytes`; fails on unreadable input or an empty page tree.
    pub fn parse(bytes: &[u8]) -> Result<Self, RenderError> {
        let inner = Document::load_mem(bytes).map_err(|e| RenderError::parse(e.to_string()))?;
        // get_pages is keyed by 1-based page number
        let page_ids: Vec<ObjectId> = inner.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(RenderError::NoPages);
        }
        Ok(Self { inner, page_ids })
    }

    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// The `MediaBox` of the page at 0-based `page_index`.
    pub fn page_box(&self, page_index: u32) -> Result<PageBox, RenderError> {
        let page_id = self
            .page_ids
            .get(page_index as usize)
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                index: page_index,
                count: self.page_count(),
            })?;
        Ok(page_tree::media_box(&self.inner, page_id))
    }

    pub fn inner(&self) -> &Document {
        &self.inner
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.inner.version)
            .field("pages", &self.page_ids.len())
            .finish()
    }
}

/// Renderer over lopdf.
#[derive(Debug, Clone, Default)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Renderer for LopdfRenderer {
    type Handle = PdfDocument;

    async fn load(&self, bytes: &[u8]) -> Result<PdfDocument, RenderError> {
        let document = PdfDocument::parse(bytes)?;
        info!(
            "Loaded PDF {} with {} pages",
            document.inner.version,
            document.page_count()
        );
        Ok(document)
    }

    fn page_count(&self, handle: &PdfDocument) -> u32 {
        handle.page_count()
    }

    async fn render_page(
        &self,
        handle: &PdfDocument,
        page_index: u32,
        scale: f64,
    ) -> Result<RenderedPage, RenderError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderError::InvalidScale { scale });
        }
        let native = handle.page_box(page_index)?.dimensions();
        let viewport = PageViewport::for_native(native, scale);

        let width = viewport.width.ceil().max(1.0) as u32;
        let height = viewport.height.ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| RenderError::Raster {
            reason: format!("cannot allocate {}x{} raster", width, height),
        })?;
        pixmap.fill(Color::WHITE);

        debug!(
            "Rendered page {} at scale {:.3}: {}x{} px",
            page_index + 1,
            scale,
            width,
            height
        );

        Ok(RenderedPage {
            raster: PageRaster {
                width,
                height,
                rgba: pixmap.take(),
            },
            viewport,
        })
    }

    fn native_page_size(&self, handle: &PdfDocument, page_index: u32) -> Result<Dimensions, RenderError> {
        Ok(handle.page_box(page_index)?.dimensions())
    }
}
