//! Signing session behaviour against scripted collaborators.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use pdfsign::{
    Dimensions, DocumentMutator, DocumentRect, InteractionMode, MutationError, PageViewport,
    Position, RenderError, RenderedPage, Renderer, SessionOptions, SignatureAsset,
    SigningSession, TrackedListeners,
};
use pdfsign_core::{shared, Shared};
use pdfsign_document::PageRaster;

const PDF: &[u8] = b"%PDF-1.7\nfake";

/// Renderer over a fixed list of page sizes. `viewport` forces the rendered
/// size regardless of scale; rendering `failing_page` (0-based) fails.
struct FakeRenderer {
    pages: Vec<Dimensions>,
    viewport: Option<(f64, f64)>,
    failing_page: Cell<Option<u32>>,
}

impl FakeRenderer {
    fn new(pages: Vec<Dimensions>, viewport: Option<(f64, f64)>) -> Self {
        Self {
            pages,
            viewport,
            failing_page: Cell::new(None),
        }
    }

    fn letter(pages: usize) -> Self {
        Self::new(vec![Dimensions::new(612.0, 792.0); pages], None)
    }
}

fn blank_page(viewport: PageViewport) -> RenderedPage {
    RenderedPage {
        raster: PageRaster {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        },
        viewport,
    }
}

#[async_trait(?Send)]
impl Renderer for FakeRenderer {
    type Handle = u32;

    async fn load(&self, bytes: &[u8]) -> Result<u32, RenderError> {
        if bytes.ends_with(b"broken") {
            return Err(RenderError::parse("unexpected end of file"));
        }
        Ok(self.pages.len() as u32)
    }

    fn page_count(&self, handle: &u32) -> u32 {
        *handle
    }

    async fn render_page(
        &self,
        _handle: &u32,
        page_index: u32,
        scale: f64,
    ) -> Result<RenderedPage, RenderError> {
        let native = self.native_page_size(&0, page_index)?;
        if self.failing_page.get() == Some(page_index) {
            return Err(RenderError::Raster {
                reason: format!("page {} raster out of memory", page_index + 1),
            });
        }
        let viewport = match self.viewport {
            Some((w, h)) => PageViewport::new(w, h, scale),
            None => PageViewport::for_native(native, scale),
        };
        Ok(blank_page(viewport))
    }

    fn native_page_size(&self, _handle: &u32, page_index: u32) -> Result<Dimensions, RenderError> {
        self.pages
            .get(page_index as usize)
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                index: page_index,
                count: self.pages.len() as u32,
            })
    }
}

/// Records every embed call; fails while `fail` is set.
#[derive(Clone)]
struct RecordingMutator {
    calls: Shared<Vec<(u32, DocumentRect)>>,
    fail: Rc<Cell<bool>>,
}

impl RecordingMutator {
    fn new() -> Self {
        Self {
            calls: shared(Vec::new()),
            fail: Rc::new(Cell::new(false)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl DocumentMutator for RecordingMutator {
    async fn embed_image(
        &self,
        source: &[u8],
        png: &[u8],
        page_index: u32,
        rect: &DocumentRect,
    ) -> Result<Vec<u8>, MutationError> {
        self.calls.borrow_mut().push((page_index, *rect));
        if self.fail.get() {
            return Err(MutationError::Write {
                reason: "disk full".into(),
            });
        }
        let mut out = source.to_vec();
        out.extend_from_slice(png);
        out.extend_from_slice(format!("{}@{}", page_index, rect).as_bytes());
        Ok(out)
    }
}

fn asset(width: u32, height: u32) -> SignatureAsset {
    SignatureAsset::new(vec![0x89, b'P', b'N', b'G'], width, height).unwrap()
}

fn session_with(
    renderer: FakeRenderer,
) -> (SigningSession<FakeRenderer, RecordingMutator>, RecordingMutator) {
    let mutator = RecordingMutator::new();
    let session = SigningSession::new(renderer, mutator.clone(), SessionOptions::default());
    (session, mutator)
}

#[tokio::test]
async fn test_load_renders_first_page() {
    let (mut session, _) = session_with(FakeRenderer::letter(3));
    let page = session
        .load_document(PDF.to_vec(), "contract.pdf", Some("application/pdf"))
        .await
        .unwrap();

    assert_eq!(page.index, 1);
    assert!((page.viewport.width - 918.0).abs() < 1e-9);
    assert!((page.viewport.height - 1188.0).abs() < 1e-9);
    assert_eq!(session.navigator().unwrap().page_count(), 3);
    assert!(session.page_raster().is_some());
    assert!(session.overlay().is_none(), "no overlay before a signature exists");
}

#[tokio::test]
async fn test_signature_overlay_centered_at_one_third() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    let overlay = session.overlay().unwrap();
    assert!((overlay.size.width - 150.0).abs() < 1e-9);
    assert!((overlay.size.height - 50.0).abs() < 1e-9);
    assert!((overlay.position.x - 384.0).abs() < 1e-9);
    assert!((overlay.position.y - 396.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_signature_before_document() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    session.set_signature(asset(300, 100)).unwrap();
    assert!(session.overlay().is_none());

    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    assert!(session.overlay().is_some());
}

#[tokio::test]
async fn test_intake_and_load_errors() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));

    let err = session.load_document(Vec::new(), "a.pdf", None).await.unwrap_err();
    assert!(err.is_invalid_input());

    let err = session
        .load_document(PDF.to_vec(), "a.png", Some("image/png"))
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());

    let err = session
        .load_document(b"%PDF-1.7 broken".to_vec(), "a.pdf", None)
        .await
        .unwrap_err();
    assert!(err.is_load_failure());
    assert!(!session.is_document_loaded());

    let (mut empty, _) = session_with(FakeRenderer::letter(0));
    assert!(empty
        .load_document(PDF.to_vec(), "a.pdf", None)
        .await
        .unwrap_err()
        .is_load_failure());
}

#[tokio::test]
async fn test_finish_requires_document_and_signature() {
    let (mut session, mutator) = session_with(FakeRenderer::letter(1));
    assert!(matches!(
        session.finish().await,
        Err(pdfsign::Error::NotReady { .. })
    ));

    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    assert!(matches!(
        session.finish().await,
        Err(pdfsign::Error::NotReady { .. })
    ));
    assert_eq!(mutator.call_count(), 0);
}

#[tokio::test]
async fn test_letter_scenario_through_gestures() {
    let renderer = FakeRenderer::new(vec![Dimensions::new(612.0, 792.0)], Some((800.0, 1000.0)));
    let (mut session, mutator) = session_with(renderer);
    session.load_document(PDF.to_vec(), "lease.pdf", None).await.unwrap();
    // 2:1 signature starts at 150x75, (325, 333.3)
    session.set_signature(asset(200, 100)).unwrap();

    let start = session.overlay().unwrap().position;
    let grab = Position::new(start.x + 5.0, start.y + 5.0);
    assert_eq!(session.pointer_down(grab), InteractionMode::Dragging);
    assert!(session.pointer_move(Position::new(355.0, 305.0)));
    assert_eq!(session.pointer_up(), InteractionMode::Dragging);

    let overlay = *session.overlay().unwrap();
    let handle = Position::new(overlay.right() - 2.0, overlay.bottom() - 2.0);
    assert_eq!(session.pointer_down(handle), InteractionMode::Resizing);
    assert!(session.pointer_move(Position::new(handle.x - 50.0, handle.y)));
    session.pointer_up();

    let overlay = session.overlay().unwrap();
    assert!((overlay.position.x - 350.0).abs() < 1e-9);
    assert!((overlay.position.y - 300.0).abs() < 1e-9);
    assert!((overlay.size.width - 100.0).abs() < 1e-9);
    assert!((overlay.size.height - 50.0).abs() < 1e-9);

    let committed = session.finish().await.unwrap();
    let rect = committed.rect();
    assert!((rect.x - 267.75).abs() < 1e-9);
    assert!((rect.width - 76.5).abs() < 1e-9);
    assert!((rect.height - 39.6).abs() < 1e-9);
    assert!((rect.y - 514.8).abs() < 1e-9);

    assert_eq!(committed.filename(), "signed_lease.pdf");
    assert_eq!(committed.page_index(), 0);
    assert_eq!(mutator.call_count(), 1);
}

#[tokio::test]
async fn test_finish_twice_is_repeatable() {
    let (mut session, mutator) = session_with(FakeRenderer::letter(2));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    let first = session.finish().await.unwrap();
    let second = session.finish().await.unwrap();
    assert_eq!(first, second);

    let calls = mutator.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn test_commit_failure_preserves_state() {
    let (mut session, mutator) = session_with(FakeRenderer::letter(2));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();
    session.go_to_page(2).await.unwrap();
    let overlay = *session.overlay().unwrap();

    mutator.fail.set(true);
    let err = session.finish().await.unwrap_err();
    assert!(err.is_commit_failed());
    assert!(err.to_string().contains("disk full"));
    assert_eq!(mutator.call_count(), 1);

    assert_eq!(*session.overlay().unwrap(), overlay);
    assert_eq!(session.page().unwrap().index, 2);
    assert!(session.asset().is_some());

    mutator.fail.set(false);
    let committed = session.finish().await.unwrap();
    assert_eq!(committed.page_index(), 1);
    assert_eq!(mutator.calls.borrow()[1].0, 1);
}

#[tokio::test]
async fn test_page_change_keeps_overlay() {
    let renderer = FakeRenderer::new(
        vec![Dimensions::new(612.0, 792.0), Dimensions::new(842.0, 595.0)],
        None,
    );
    let (mut session, _) = session_with(renderer);
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();
    let before = *session.overlay().unwrap();

    let page = session.go_to_page(2).await.unwrap().unwrap();
    assert_eq!(page.index, 2);
    assert!((page.viewport.width - 1263.0).abs() < 1e-9);
    assert_eq!(*session.overlay().unwrap(), before);

    assert!(session.go_to_page(0).await.unwrap().is_none());
    assert!(session.go_to_page(3).await.unwrap().is_none());
    assert!(session.next_page().await.unwrap().is_none());
    assert_eq!(session.page().unwrap().index, 2);

    let page = session.previous_page().await.unwrap().unwrap();
    assert_eq!(page.index, 1);
}

#[tokio::test]
async fn test_stale_render_is_discarded() {
    let (mut session, _) = session_with(FakeRenderer::letter(3));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();
    let overlay = *session.overlay().unwrap();

    let older = session.issue_render().unwrap();
    let newer = session.issue_render().unwrap();
    assert!(session.is_render_in_flight());

    // Gestures and commits wait for the render
    assert_eq!(session.pointer_down(overlay.position), InteractionMode::Idle);
    assert!(matches!(
        session.finish().await,
        Err(pdfsign::Error::NotReady { .. })
    ));

    let newer_outcome = session.render(&newer).await;
    let older_outcome = session.render(&older).await;
    assert!(session.apply_render(newer, newer_outcome).unwrap().is_some());
    assert!(session.apply_render(older, older_outcome).unwrap().is_none());

    assert!(!session.is_render_in_flight());
    assert_eq!(
        session.pointer_down(Position::new(overlay.position.x + 1.0, overlay.position.y + 1.0)),
        InteractionMode::Dragging
    );
}

#[tokio::test]
async fn test_render_from_previous_document_is_discarded() {
    let (mut session, _) = session_with(FakeRenderer::letter(2));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    let abandoned = session.issue_render().unwrap();

    session.load_document(PDF.to_vec(), "b.pdf", None).await.unwrap();
    let shown = *session.page().unwrap();
    let current = session.issue_render().unwrap();
    assert!(current.ticket > abandoned.ticket);

    let late = blank_page(PageViewport::new(50.0, 50.0, 0.1));
    assert!(session.apply_render(abandoned, Ok(late)).unwrap().is_none());
    assert!(session.is_render_in_flight());
    assert_eq!(*session.page().unwrap(), shown);

    let outcome = session.render(&current).await;
    assert!(session.apply_render(current, outcome).unwrap().is_some());
    assert!(!session.is_render_in_flight());

    // A ticket is applied at most once
    let again = session.render(&current).await;
    assert!(session.apply_render(current, again).unwrap().is_none());
}

#[tokio::test]
async fn test_render_from_before_reset_is_discarded() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    let abandoned = session.issue_render().unwrap();

    session.reset();
    assert!(!session.is_render_in_flight());
    session.load_document(PDF.to_vec(), "b.pdf", None).await.unwrap();

    let late = blank_page(PageViewport::new(50.0, 50.0, 0.1));
    assert!(session.apply_render(abandoned, Ok(late)).unwrap().is_none());
    assert!((session.page().unwrap().viewport.width - 918.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_page_render_keeps_previous_page() {
    let renderer = FakeRenderer::letter(3);
    renderer.failing_page.set(Some(1));
    let (mut session, mutator) = session_with(renderer);
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    let err = session.go_to_page(2).await.unwrap_err();
    assert!(err.is_load_failure());
    assert_eq!(session.navigator().unwrap().current_page(), 1);
    assert_eq!(session.page().unwrap().index, 1);
    assert!(!session.is_render_in_flight());

    assert!(session.next_page().await.is_err());
    assert_eq!(session.navigator().unwrap().current_page(), 1);

    // Once the page renders, retrying the same request moves there
    session.renderer().failing_page.set(None);
    let page = session.go_to_page(2).await.unwrap().unwrap();
    assert_eq!(page.index, 2);
    assert_eq!(session.navigator().unwrap().current_page(), 2);

    let committed = session.finish().await.unwrap();
    assert_eq!(committed.page_index(), 1);
    assert_eq!(mutator.calls.borrow()[0].0, 1);
}

#[tokio::test]
async fn test_render_cancels_active_gesture() {
    let listeners = Rc::new(TrackedListeners::new());
    let mutator = RecordingMutator::new();
    let mut session = SigningSession::new(FakeRenderer::letter(2), mutator, SessionOptions::default())
        .with_listener_host(listeners.clone());
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    let overlay = *session.overlay().unwrap();
    session.pointer_down(Position::new(overlay.position.x + 1.0, overlay.position.y + 1.0));
    assert_eq!(listeners.active_count(), 1);

    session.next_page().await.unwrap();
    assert_eq!(listeners.active_count(), 0);
    assert_eq!(session.mode(), InteractionMode::Idle);
}

#[tokio::test]
async fn test_width_fit_rerenders_on_container_resize() {
    let options = SessionOptions {
        fit_to_width: true,
        ..SessionOptions::default()
    };
    let mut session = SigningSession::new(FakeRenderer::letter(1), RecordingMutator::new(), options);
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();

    let page = session.resize_container(1224.0).await.unwrap().unwrap();
    assert!((page.viewport.scale - 2.0).abs() < 1e-12);
    assert!((page.viewport.width - 1224.0).abs() < 1e-9);
    assert!(session.resize_container(1224.0).await.unwrap().is_none());
}

#[tokio::test]
async fn test_place_in_document_space() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    assert!(session.place_in_document_space(72.0, 72.0, 180.0).unwrap());
    let rect = session.document_rect().unwrap();
    assert!(rect.approx_eq(&DocumentRect::new(72.0, 72.0, 180.0, 60.0), 1e-9), "{}", rect);

    // Off the right edge
    assert!(!session.place_in_document_space(500.0, 72.0, 180.0).unwrap());
}

#[tokio::test]
async fn test_capture_signature_from_pad() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    let mut pad = pdfsign::CaptureSurface::new(500.0, 200.0, 1.0).unwrap();
    assert!(session.capture_signature(&pad).unwrap_err().is_invalid_input());

    pad.begin_stroke(Position::new(10.0, 10.0));
    pad.extend_stroke(Position::new(200.0, 120.0));
    pad.end_stroke();
    session.capture_signature(&pad).unwrap();
    assert!((session.asset().unwrap().aspect_ratio() - 2.5).abs() < 1e-12);
}

#[tokio::test]
async fn test_reset_discards_everything() {
    let (mut session, _) = session_with(FakeRenderer::letter(1));
    session.load_document(PDF.to_vec(), "a.pdf", None).await.unwrap();
    session.set_signature(asset(300, 100)).unwrap();

    session.reset();
    assert!(!session.is_document_loaded());
    assert!(session.asset().is_none());
    assert!(session.overlay().is_none());
    assert!(session.page().is_none());
    assert!(session.next_page().await.is_err());
}
