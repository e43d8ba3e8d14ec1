//! Placement type definitions: InteractionMode, HitRegion, Interaction.

use std::fmt;

use pdfsign_core::{Dimensions, Position};

use super::listener::ListenerRegistration;

/// Which direct-manipulation gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Dragging,
    Resizing,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Dragging => write!(f, "dragging"),
            Self::Resizing => write!(f, "resizing"),
        }
    }
}

/// Where a pointer-down landed relative to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// The resize handle at the bottom-right corner.
    Handle,
    /// Anywhere else inside the overlay box.
    Body,
    Outside,
}

/// Active gesture with the data only that gesture needs.
///
/// The listener registration lives inside the active variant, so replacing
/// the interaction with `Idle` releases it.
#[derive(Debug)]
pub(crate) enum Interaction {
    Idle,
    Dragging {
        /// Pointer offset from the overlay's top-left corner at pointer-down.
        grab_offset: Position,
        _listeners: ListenerRegistration,
    },
    Resizing {
        /// Pointer position at pointer-down.
        origin: Position,
        /// Overlay size at pointer-down.
        initial_size: Dimensions,
        _listeners: ListenerRegistration,
    },
}

impl Interaction {
    pub(crate) fn mode(&self) -> InteractionMode {
        match self {
            Interaction::Idle => InteractionMode::Idle,
            Interaction::Dragging { .. } => InteractionMode::Dragging,
            Interaction::Resizing { .. } => InteractionMode::Resizing,
        }
    }
}
