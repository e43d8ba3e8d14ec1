//! # PdfSign Designer
//!
//! The interactive half of a signing session: acquiring a signature and
//! placing it on a rendered page.
//!
//! ## Components
//!
//! - **Mapper**: converts the overlay between canvas pixels and PDF points
//! - **Capture**: freehand signature pad rasterized to a transparent PNG
//! - **Placement**: drag/resize state machine for the signature overlay
//! - **Navigator**: current page, page count, and render scale
//! - **Render sequence**: tags render requests so late results are dropped
//!
//! ```text
//! CaptureSurface ──export──▶ SignatureAsset
//!                                 │ aspect ratio
//!                                 ▼
//! PageNavigator ──viewport──▶ PlacementController ──overlay──▶ mapper ──▶ DocumentRect
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdfsign_designer::{CaptureSurface, PlacementController};
//!
//! let mut pad = CaptureSurface::new(500.0, 200.0, 2.0)?;
//! pad.begin_stroke(Position::new(10.0, 10.0));
//! pad.extend_stroke(Position::new(120.0, 80.0));
//! pad.end_stroke();
//! let asset = pad.export()?;
//!
//! let mut placement = PlacementController::new(&asset, 150.0, listeners)?;
//! placement.set_viewport(viewport)?;
//! ```

pub mod capture;
pub mod mapper;
pub mod navigator;
pub mod placement;
pub mod render_sequence;

pub use capture::{CaptureSurface, SignatureAsset};
pub use mapper::{fit_scale, to_canvas_space, to_document_space, PageMapping};
pub use navigator::PageNavigator;
pub use placement::{
    HitRegion, InteractionMode, ListenerId, ListenerRegistration, PlacementController,
    PointerListenerHost, TrackedListeners,
};
pub use render_sequence::{RenderSequencer, RenderTicket};
