//! Interactive placement of the signature overlay on a rendered page.
//!
//! The controller owns one [`OverlayState`] in canvas space and a small state
//! machine:
//!
//! ```text
//! Idle ──pointer-down on body───▶ Dragging ──pointer-up──▶ Idle
//! Idle ──pointer-down on handle─▶ Resizing ──pointer-up──▶ Idle
//! ```
//!
//! Every completed update leaves the overlay inside the current viewport with
//! `width >= MIN_OVERLAY_WIDTH`; an update that cannot satisfy that is
//! dropped, never partially applied.

mod listener;
mod types;

pub use listener::{ListenerId, ListenerRegistration, PointerListenerHost, TrackedListeners};
pub use types::{HitRegion, InteractionMode};

use std::rc::Rc;

use pdfsign_core::constants::{
    GEOMETRY_EPSILON, INITIAL_OVERLAY_TOP_FRACTION, MIN_OVERLAY_WIDTH, RESIZE_HANDLE_SIZE,
};
use pdfsign_core::{Dimensions, OverlayState, PageViewport, Position, Result};
use tracing::{debug, info, warn};

use crate::capture::SignatureAsset;
use types::Interaction;

/// Drag/resize state machine for the signature overlay.
pub struct PlacementController {
    /// Width / height of the signature asset; never taken from the live overlay.
    aspect_ratio: f64,
    default_width: f64,
    overlay: Option<OverlayState>,
    viewport: Option<PageViewport>,
    interaction: Interaction,
    suspended: bool,
    listeners: Rc<dyn PointerListenerHost>,
}

impl PlacementController {
    /// Creates a controller for `asset`.
    ///
    /// The overlay does not exist until the first viewport arrives through
    /// [`set_viewport`](Self::set_viewport).
    pub fn new(
        asset: &SignatureAsset,
        default_width: f64,
        listeners: Rc<dyn PointerListenerHost>,
    ) -> Result<Self> {
        let asset_size = asset.dimensions().validated("signature asset")?;
        Ok(Self {
            aspect_ratio: asset_size.aspect_ratio(),
            default_width: default_width.max(MIN_OVERLAY_WIDTH),
            overlay: None,
            viewport: None,
            interaction: Interaction::Idle,
            suspended: false,
            listeners,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// The overlay box, once the first page has rendered.
    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn viewport(&self) -> Option<&PageViewport> {
        self.viewport.as_ref()
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Whether the overlay has been placed for this session.
    pub fn is_initialized(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Installs the viewport of a freshly rendered page.
    ///
    /// The first call places the overlay centred horizontally with its top
    /// edge at one third of the page height. Later calls only replace the
    /// clamping bounds: the overlay is neither re-centred nor re-clamped.
    pub fn set_viewport(&mut self, viewport: PageViewport) -> Result<()> {
        viewport.dimensions().validated("page viewport")?;
        self.viewport = Some(viewport);

        match self.overlay {
            None => {
                let overlay = self.initial_overlay(&viewport);
                info!("Overlay placed at {}", overlay);
                self.overlay = Some(overlay);
            }
            Some(overlay) => {
                if !overlay.fits_within(&viewport.dimensions()) {
                    warn!(
                        "Overlay {} extends past new {}x{} viewport; left in place",
                        overlay, viewport.width, viewport.height
                    );
                }
            }
        }
        Ok(())
    }

    fn initial_overlay(&self, viewport: &PageViewport) -> OverlayState {
        let mut width = self.default_width.min(viewport.width);
        let mut height = width / self.aspect_ratio;
        if height > viewport.height {
            height = viewport.height;
            width = height * self.aspect_ratio;
        }

        let x = (viewport.width - width) / 2.0;
        let y = (viewport.height * INITIAL_OVERLAY_TOP_FRACTION)
            .min(viewport.height - height)
            .max(0.0);
        OverlayState::new(Position::new(x, y), Dimensions::new(width, height))
    }

    /// Classifies `point` against the overlay and its resize handle.
    pub fn hit_test(&self, point: &Position) -> HitRegion {
        let Some(overlay) = self.overlay else {
            return HitRegion::Outside;
        };
        if !overlay.contains(point) {
            return HitRegion::Outside;
        }
        let handle = RESIZE_HANDLE_SIZE
            .min(overlay.size.width)
            .min(overlay.size.height);
        if point.x >= overlay.right() - handle && point.y >= overlay.bottom() - handle {
            HitRegion::Handle
        } else {
            HitRegion::Body
        }
    }

    fn accepts_gesture(&self) -> bool {
        if self.suspended {
            debug!("Gesture refused: page render in progress");
            return false;
        }
        self.overlay.is_some()
            && self.viewport.is_some()
            && self.interaction.mode() == InteractionMode::Idle
    }

    /// Routes a pointer-down to a resize (handle) or drag (body).
    ///
    /// Returns the mode entered; `Idle` if the press started nothing.
    pub fn pointer_down(&mut self, point: Position) -> InteractionMode {
        match self.hit_test(&point) {
            HitRegion::Handle => {
                self.start_resize(point);
            }
            HitRegion::Body => {
                self.start_drag(point);
            }
            HitRegion::Outside => {}
        }
        self.mode()
    }

    /// Begins dragging; records where inside the box the pointer grabbed it.
    pub fn start_drag(&mut self, point: Position) -> bool {
        if !self.accepts_gesture() {
            return false;
        }
        let Some(overlay) = self.overlay else {
            return false;
        };
        let grab_offset = point.relative_to(&overlay.position);
        self.interaction = Interaction::Dragging {
            grab_offset,
            _listeners: ListenerRegistration::acquire(&self.listeners),
        };
        debug!("Drag started, grab offset {}", grab_offset);
        true
    }

    /// Begins resizing from the handle.
    pub fn start_resize(&mut self, point: Position) -> bool {
        if !self.accepts_gesture() {
            return false;
        }
        let Some(overlay) = self.overlay else {
            return false;
        };
        self.interaction = Interaction::Resizing {
            origin: point,
            initial_size: overlay.size,
            _listeners: ListenerRegistration::acquire(&self.listeners),
        };
        debug!("Resize started at {} from {}", point, overlay.size);
        true
    }

    /// Applies a surface-wide pointer-move. Returns true if the overlay changed.
    pub fn pointer_move(&mut self, point: Position) -> bool {
        match &self.interaction {
            Interaction::Idle => false,
            Interaction::Dragging { grab_offset, .. } => {
                let grab_offset = *grab_offset;
                self.drag_to(point, grab_offset)
            }
            Interaction::Resizing {
                origin,
                initial_size,
                ..
            } => {
                let (origin, initial_size) = (*origin, *initial_size);
                self.resize_to(point, origin, initial_size)
            }
        }
    }

    fn drag_to(&mut self, point: Position, grab_offset: Position) -> bool {
        let (Some(overlay), Some(viewport)) = (self.overlay, self.viewport) else {
            return false;
        };
        let max_x = viewport.width - overlay.size.width;
        let max_y = viewport.height - overlay.size.height;
        if max_x < 0.0 || max_y < 0.0 {
            warn!("Overlay {} does not fit the viewport; drag update dropped", overlay);
            return false;
        }

        let target = point.relative_to(&grab_offset);
        let position = Position::new(target.x.clamp(0.0, max_x), target.y.clamp(0.0, max_y));
        self.apply(OverlayState::new(position, overlay.size))
    }

    fn resize_to(&mut self, point: Position, origin: Position, initial_size: Dimensions) -> bool {
        let (Some(overlay), Some(viewport)) = (self.overlay, self.viewport) else {
            return false;
        };
        let max_width = viewport.width - overlay.position.x;
        if max_width < MIN_OVERLAY_WIDTH {
            return false;
        }

        let delta_x = point.x - origin.x;
        let width = (initial_size.width + delta_x).clamp(MIN_OVERLAY_WIDTH, max_width);
        let height = width / self.aspect_ratio;
        if overlay.position.y + height > viewport.height + GEOMETRY_EPSILON {
            debug!("Resize to width {:.2} would cross the page bottom; ignored", width);
            return false;
        }
        self.apply(OverlayState::new(
            overlay.position,
            Dimensions::new(width, height),
        ))
    }

    /// Places the overlay's top-left at `position` with `width` (height follows
    /// the asset's aspect ratio). Only accepted while idle.
    pub fn place(&mut self, position: Position, width: f64) -> bool {
        if !self.accepts_gesture() {
            return false;
        }
        let size = Dimensions::new(width, width / self.aspect_ratio);
        self.apply(OverlayState::new(position, size))
    }

    fn is_admissible(&self, candidate: &OverlayState, viewport: &PageViewport) -> bool {
        candidate.size.width >= MIN_OVERLAY_WIDTH - GEOMETRY_EPSILON
            && candidate.size.height > 0.0
            && candidate.fits_within(&viewport.dimensions())
    }

    fn apply(&mut self, candidate: OverlayState) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        if !self.is_admissible(&candidate, &viewport) {
            debug!("Overlay update {} dropped: outside page bounds", candidate);
            return false;
        }
        self.overlay = Some(candidate);
        true
    }

    /// Ends any drag or resize. Returns the mode that was active.
    pub fn pointer_up(&mut self) -> InteractionMode {
        let previous = self.interaction.mode();
        self.interaction = Interaction::Idle;
        if previous != InteractionMode::Idle {
            debug!("Finished {}", previous);
        }
        previous
    }

    /// Ends any gesture after the pointer was lost (capture lost, window blur).
    pub fn pointer_cancel(&mut self) -> InteractionMode {
        let previous = self.pointer_up();
        if previous != InteractionMode::Idle {
            warn!("Pointer lost while {}; gesture ended", previous);
        }
        previous
    }

    /// Blocks new gestures while a page render is in flight and ends any active one.
    pub fn suspend(&mut self) {
        self.pointer_cancel();
        self.suspended = true;
    }

    /// Re-enables gestures once a render has landed.
    pub fn resume(&mut self) {
        self.suspended = false;
    }
}

impl std::fmt::Debug for PlacementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementController")
            .field("aspect_ratio", &self.aspect_ratio)
            .field("overlay", &self.overlay)
            .field("viewport", &self.viewport)
            .field("interaction", &self.interaction)
            .field("suspended", &self.suspended)
            .finish()
    }
}
