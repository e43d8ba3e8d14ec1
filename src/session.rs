//! The signing session.
//!
//! A [`SigningSession`] ties the workspace together for one document:
//! it loads the source through a [`Renderer`], keeps the page navigator and
//! placement controller in step with each rendered page, and commits the
//! final overlay through a [`DocumentMutator`].
//!
//! Everything runs on one thread. Page renders are the only long-running
//! step; each is tagged with a [`RenderTicket`] so a late completion for a
//! page the user has already left is discarded.

use std::rc::Rc;

use pdfsign_core::{
    DocumentRect, Dimensions, Error, OverlayState, PageContext, Position, Result,
};
use pdfsign_designer::{
    to_canvas_space, to_document_space, CaptureSurface, InteractionMode, PageNavigator,
    PlacementController, PointerListenerHost, RenderSequencer, RenderTicket, SignatureAsset,
    TrackedListeners,
};
use pdfsign_document::{
    suggested_filename, validate_source, DocumentMutator, PageRaster, RenderError, RenderedPage,
    Renderer,
};
use pdfsign_settings::Config;
use tracing::{debug, info, warn};

use crate::commit::CommittedDocument;

/// Session tunables, normally taken from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub render_scale: f64,
    pub fit_to_width: bool,
    pub container_width: Option<f64>,
    pub default_overlay_width: f64,
    pub filename_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            render_scale: config.render.scale,
            fit_to_width: config.render.fit_to_width,
            container_width: config.render.container_width,
            default_overlay_width: config.placement.default_overlay_width,
            filename_prefix: config.output.filename_prefix.clone(),
        }
    }
}

/// A page render the host must carry out and hand back through
/// [`SigningSession::apply_render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub ticket: RenderTicket,
    /// 0-based.
    pub page_index: u32,
    pub scale: f64,
}

struct LoadedDocument<H> {
    source: Vec<u8>,
    name: String,
    handle: H,
    navigator: PageNavigator,
}

/// One document, one signature, one overlay.
pub struct SigningSession<R: Renderer, M: DocumentMutator> {
    renderer: R,
    mutator: M,
    options: SessionOptions,
    listeners: Rc<dyn PointerListenerHost>,
    document: Option<LoadedDocument<R::Handle>>,
    asset: Option<SignatureAsset>,
    placement: Option<PlacementController>,
    page: Option<PageContext>,
    raster: Option<PageRaster>,
    sequencer: RenderSequencer,
}

impl<R: Renderer, M: DocumentMutator> SigningSession<R, M> {
    pub fn new(renderer: R, mutator: M, options: SessionOptions) -> Self {
        Self {
            renderer,
            mutator,
            options,
            listeners: Rc::new(TrackedListeners::new()),
            document: None,
            asset: None,
            placement: None,
            page: None,
            raster: None,
            sequencer: RenderSequencer::new(),
        }
    }

    /// Routes surface-wide pointer subscriptions to `host` instead of the
    /// built-in headless tracker.
    pub fn with_listener_host(mut self, host: Rc<dyn PointerListenerHost>) -> Self {
        self.listeners = host;
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_document_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn navigator(&self) -> Option<&PageNavigator> {
        self.document.as_ref().map(|d| &d.navigator)
    }

    /// The page currently on screen, once a render has landed.
    pub fn page(&self) -> Option<&PageContext> {
        self.page.as_ref()
    }

    pub fn page_raster(&self) -> Option<&PageRaster> {
        self.raster.as_ref()
    }

    pub fn asset(&self) -> Option<&SignatureAsset> {
        self.asset.as_ref()
    }

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.placement.as_ref().and_then(|p| p.overlay())
    }

    pub fn mode(&self) -> InteractionMode {
        self.placement
            .as_ref()
            .map_or(InteractionMode::Idle, |p| p.mode())
    }

    pub fn is_render_in_flight(&self) -> bool {
        self.sequencer.is_in_flight()
    }

    fn loaded(&self) -> Result<&LoadedDocument<R::Handle>> {
        self.document
            .as_ref()
            .ok_or_else(|| Error::not_ready("no document loaded"))
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedDocument<R::Handle>> {
        self.document
            .as_mut()
            .ok_or_else(|| Error::not_ready("no document loaded"))
    }

    /// Validates and parses `bytes`, then renders page 1.
    ///
    /// Replaces any previously loaded document. A captured signature is kept
    /// and gets a fresh overlay on the new document.
    pub async fn load_document(
        &mut self,
        bytes: Vec<u8>,
        name: &str,
        media_type: Option<&str>,
    ) -> Result<PageContext> {
        validate_source(&bytes, media_type)?;
        let handle = self.renderer.load(&bytes).await?;
        let page_count = self.renderer.page_count(&handle);

        let mut navigator =
            PageNavigator::new(page_count, self.options.render_scale)?.with_fit_to_width(self.options.fit_to_width);
        if let Some(width) = self.options.container_width {
            navigator.set_container_width(width);
        }

        info!("Loaded '{}' ({} bytes, {} pages)", name, bytes.len(), page_count);
        self.document = Some(LoadedDocument {
            source: bytes,
            name: name.to_string(),
            handle,
            navigator,
        });
        self.page = None;
        self.raster = None;
        self.sequencer.cancel();
        if let Some(asset) = self.asset.clone() {
            self.placement = Some(self.new_placement(&asset)?);
        }

        self.render_current_page().await
    }

    fn new_placement(&self, asset: &SignatureAsset) -> Result<PlacementController> {
        PlacementController::new(
            asset,
            self.options.default_overlay_width,
            Rc::clone(&self.listeners),
        )
    }

    /// Installs the signature to place. Replaces any earlier signature and
    /// its overlay; if a page is already on screen the overlay appears now.
    pub fn set_signature(&mut self, asset: SignatureAsset) -> Result<()> {
        let mut placement = self.new_placement(&asset)?;
        if let Some(page) = self.page {
            placement.set_viewport(page.viewport)?;
        }
        if self.sequencer.is_in_flight() {
            placement.suspend();
        }
        info!(
            "Signature set: {}x{} px (aspect {:.3})",
            asset.width(),
            asset.height(),
            asset.aspect_ratio()
        );
        self.asset = Some(asset);
        self.placement = Some(placement);
        Ok(())
    }

    /// Exports the pad and installs the result as the signature.
    pub fn capture_signature(&mut self, surface: &CaptureSurface) -> Result<()> {
        let asset = surface.export()?;
        self.set_signature(asset)
    }

    /// Starts a render of the current page; later requests supersede it.
    ///
    /// Gestures are suspended until the matching [`apply_render`](Self::apply_render).
    pub fn issue_render(&mut self) -> Result<RenderRequest> {
        let document = self.loaded()?;
        let page_index = document.navigator.page_index();
        let native = self.renderer.native_page_size(&document.handle, page_index)?;
        let scale = document.navigator.render_scale(&native)?;

        let ticket = self.sequencer.issue();
        if let Some(placement) = self.placement.as_mut() {
            placement.suspend();
        }
        debug!("{} requested: page {} at {:.3}", ticket, page_index + 1, scale);
        Ok(RenderRequest {
            ticket,
            page_index,
            scale,
        })
    }

    /// Runs `request` on the renderer. Does not change session state.
    pub async fn render(&self, request: &RenderRequest) -> std::result::Result<RenderedPage, RenderError> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| RenderError::parse("no document loaded"))?;
        self.renderer
            .render_page(&document.handle, request.page_index, request.scale)
            .await
    }

    /// Applies a finished render.
    ///
    /// Returns `Ok(None)` and changes nothing if a newer request has been
    /// issued since `request`. Otherwise the page context is replaced
    /// wholesale and gestures resume; the overlay is placed on the first
    /// render and left where it is afterwards.
    pub fn apply_render(
        &mut self,
        request: RenderRequest,
        outcome: std::result::Result<RenderedPage, RenderError>,
    ) -> Result<Option<PageContext>> {
        if !self.sequencer.complete(request.ticket) {
            warn!("Discarding stale {} for page {}", request.ticket, request.page_index + 1);
            return Ok(None);
        }
        if let Some(placement) = self.placement.as_mut() {
            placement.resume();
        }

        let rendered = outcome?;
        let page = PageContext::new(request.page_index + 1, rendered.viewport);
        if let Some(placement) = self.placement.as_mut() {
            placement.set_viewport(rendered.viewport)?;
        }
        self.page = Some(page);
        self.raster = Some(rendered.raster);

        info!(
            "Page {} rendered at {:.0}x{:.0}",
            page.index, page.viewport.width, page.viewport.height
        );
        Ok(Some(page))
    }

    /// Issues, awaits, and applies a render of the current page.
    pub async fn render_current_page(&mut self) -> Result<PageContext> {
        let request = self.issue_render()?;
        let outcome = self.render(&request).await;
        self.apply_render(request, outcome)?
            .ok_or_else(|| Error::other("render superseded"))
    }

    /// Moves to page `n` (1-based) and renders it.
    ///
    /// Returns `None` when the page did not change (out of range or already
    /// current).
    pub async fn go_to_page(&mut self, n: u32) -> Result<Option<PageContext>> {
        let navigator = &mut self.loaded_mut()?.navigator;
        let previous = navigator.current_page();
        if !navigator.go_to_page(n) {
            return Ok(None);
        }
        self.render_moved_page(previous).await
    }

    pub async fn next_page(&mut self) -> Result<Option<PageContext>> {
        let navigator = &mut self.loaded_mut()?.navigator;
        let previous = navigator.current_page();
        if !navigator.next() {
            return Ok(None);
        }
        self.render_moved_page(previous).await
    }

    pub async fn previous_page(&mut self) -> Result<Option<PageContext>> {
        let navigator = &mut self.loaded_mut()?.navigator;
        let previous = navigator.current_page();
        if !navigator.previous() {
            return Ok(None);
        }
        self.render_moved_page(previous).await
    }

    /// Renders the page the navigator just moved to. If the render fails the
    /// navigator goes back to `previous`, the page still on screen.
    async fn render_moved_page(&mut self, previous: u32) -> Result<Option<PageContext>> {
        match self.render_current_page().await {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                if let Some(document) = self.document.as_mut() {
                    warn!(
                        "Render of page {} failed; staying on page {}",
                        document.navigator.current_page(),
                        previous
                    );
                    document.navigator.go_to_page(previous);
                }
                Err(e)
            }
        }
    }

    /// Reports a new container width; re-renders if width-fit is active.
    pub async fn resize_container(&mut self, width: f64) -> Result<Option<PageContext>> {
        self.options.container_width = Some(width);
        if !self.loaded_mut()?.navigator.set_container_width(width) {
            return Ok(None);
        }
        self.render_current_page().await.map(Some)
    }

    pub fn pointer_down(&mut self, point: Position) -> InteractionMode {
        self.placement
            .as_mut()
            .map_or(InteractionMode::Idle, |p| p.pointer_down(point))
    }

    pub fn pointer_move(&mut self, point: Position) -> bool {
        self.placement
            .as_mut()
            .is_some_and(|p| p.pointer_move(point))
    }

    pub fn pointer_up(&mut self) -> InteractionMode {
        self.placement
            .as_mut()
            .map_or(InteractionMode::Idle, |p| p.pointer_up())
    }

    pub fn pointer_cancel(&mut self) -> InteractionMode {
        self.placement
            .as_mut()
            .map_or(InteractionMode::Idle, |p| p.pointer_cancel())
    }

    fn native_size(&self, page: &PageContext) -> Result<Dimensions> {
        let document = self.loaded()?;
        Ok(self
            .renderer
            .native_page_size(&document.handle, page.zero_based())?)
    }

    /// Moves the overlay so its lower-left corner sits at `(x, y)` PDF points
    /// with `width` points (height follows the signature's aspect ratio).
    ///
    /// Returns false if that placement does not fit the page.
    pub fn place_in_document_space(&mut self, x: f64, y: f64, width: f64) -> Result<bool> {
        let page = self
            .page
            .ok_or_else(|| Error::not_ready("no page rendered"))?;
        let native = self.native_size(&page)?;
        let placement = self
            .placement
            .as_mut()
            .ok_or_else(|| Error::not_ready("no signature to place"))?;

        let height = width / placement.aspect_ratio();
        let rect = DocumentRect::new(x, y, width, height);
        let canvas = to_canvas_space(&rect, &page.viewport, &native)?;
        Ok(placement.place(canvas.position, canvas.size.width))
    }

    /// The overlay's current rectangle in PDF points.
    pub fn document_rect(&self) -> Result<DocumentRect> {
        let page = self
            .page
            .ok_or_else(|| Error::not_ready("no page rendered"))?;
        let overlay = self
            .overlay()
            .ok_or_else(|| Error::not_ready("no signature placed"))?;
        let native = self.native_size(&page)?;
        to_document_space(overlay, &page.viewport, &native)
    }

    /// Bakes the signature into a copy of the source document.
    ///
    /// Calls the mutator exactly once. On failure the session is unchanged
    /// and `finish` may be retried.
    pub async fn finish(&self) -> Result<CommittedDocument> {
        let document = self.loaded()?;
        if self.sequencer.is_in_flight() {
            return Err(Error::not_ready("page render in progress"));
        }
        let asset = self
            .asset
            .as_ref()
            .ok_or_else(|| Error::not_ready("no signature captured"))?;
        let page = self
            .page
            .ok_or_else(|| Error::not_ready("no page rendered"))?;
        let rect = self.document_rect()?;

        debug!("Committing {} on page {}", rect, page.index);
        let bytes = self
            .mutator
            .embed_image(&document.source, asset.png_bytes(), page.zero_based(), &rect)
            .await
            .map_err(|e| {
                warn!("Commit failed: {}", e);
                Error::from(e)
            })?;

        let filename = suggested_filename(&document.name, &self.options.filename_prefix);
        info!("Signed '{}' on page {} -> {}", document.name, page.index, filename);
        Ok(CommittedDocument::new(bytes, filename, page.zero_based(), rect))
    }

    /// Drops the document, signature, overlay, and page state.
    pub fn reset(&mut self) {
        self.document = None;
        self.asset = None;
        self.placement = None;
        self.page = None;
        self.raster = None;
        self.sequencer.cancel();
        info!("Session reset");
    }
}
