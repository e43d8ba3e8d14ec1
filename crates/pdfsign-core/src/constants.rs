//! Fixed values used across the workspace.

/// Smallest overlay width (canvas pixels) a resize may produce.
pub const MIN_OVERLAY_WIDTH: f64 = 30.0;

/// Overlay width used when the signature is first placed on a page.
pub const DEFAULT_OVERLAY_WIDTH: f64 = 150.0;

/// Fraction of the page height at which the overlay's top edge starts.
pub const INITIAL_OVERLAY_TOP_FRACTION: f64 = 1.0 / 3.0;

/// Side length of the square resize handle at the overlay's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f64 = 14.0;

/// Ink line width in logical capture-surface pixels.
pub const INK_WIDTH: f32 = 2.5;

/// Ink colour as RGBA.
pub const INK_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Native page size assumed when a page carries no usable MediaBox (US Letter).
pub const FALLBACK_PAGE_SIZE: (f64, f64) = (612.0, 792.0);

/// Prefix applied to the original filename of a committed document.
pub const SIGNED_FILENAME_PREFIX: &str = "signed_";

/// Tolerance used when checking geometric invariants on floating-point values.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
