//! # PdfSign Core
//!
//! Core types shared by every PdfSign crate:
//!
//! - **Geometry**: [`Dimensions`], [`Position`], [`PageViewport`], [`OverlayState`],
//!   [`PageContext`] and [`DocumentRect`]
//! - **Errors**: the session-level [`Error`] taxonomy and [`Result`] alias
//! - **Constants**: fixed presentation and interaction values
//! - **Types**: aliases for single-threaded shared state
//!
//! Canvas-space values (pixels, origin top-left) and document-space values
//! (PDF points, origin bottom-left) share the same structs; the unit is implied
//! by context and only the coordinate mapper converts between them.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::{DocumentRect, Dimensions, OverlayState, PageContext, PageViewport, Position};
pub use types::{shared, Shared};
