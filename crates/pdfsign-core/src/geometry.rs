//! Geometry shared by the placement workspace and the commit pipeline.
//!
//! Canvas space: pixels, (0,0) at the top-left of the rendered page, +Y down.
//! Document space: PDF points, (0,0) at the bottom-left of the page, +Y up.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::GEOMETRY_EPSILON;
use crate::error::{Error, Result};

/// Width and height in either pixel or point space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Creates new dimensions without validation.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns `self` if valid, otherwise an `InvalidDimensions` error naming `context`.
    pub fn validated(self, context: &str) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::invalid_dimensions(context, self.width, self.height))
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Multiplies both sides by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x{:.2}", self.width, self.height)
    }
}

/// A point in canvas-pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn relative_to(&self, origin: &Position) -> Position {
        Position::new(self.x - origin.x, self.y - origin.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Pixel size of a rendered page and the scale it was rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageViewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl PageViewport {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Viewport for a page of `native` points rendered at `scale`.
    pub fn for_native(native: Dimensions, scale: f64) -> Self {
        let size = native.scaled(scale);
        Self::new(size.width, size.height, scale)
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// The overlay bounding box in canvas space.
///
/// `position` is the top-left corner of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    pub position: Position,
    pub size: Dimensions,
}

impl OverlayState {
    pub fn new(position: Position, size: Dimensions) -> Self {
        Self { position, size }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }

    /// Returns true if `point` lies inside the box (edges inclusive).
    pub fn contains(&self, point: &Position) -> bool {
        point.x >= self.position.x
            && point.x <= self.right()
            && point.y >= self.position.y
            && point.y <= self.bottom()
    }

    /// Returns true if the box lies entirely inside `[0, width] x [0, height]`.
    pub fn fits_within(&self, bounds: &Dimensions) -> bool {
        self.position.x >= -GEOMETRY_EPSILON
            && self.position.y >= -GEOMETRY_EPSILON
            && self.right() <= bounds.width + GEOMETRY_EPSILON
            && self.bottom() <= bounds.height + GEOMETRY_EPSILON
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.size, self.position)
    }
}

/// The page currently shown, 1-based, with the viewport it was rendered into.
///
/// Replaced wholesale on every page change or container resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageContext {
    pub index: u32,
    pub viewport: PageViewport,
}

impl PageContext {
    pub fn new(index: u32, viewport: PageViewport) -> Self {
        Self { index, viewport }
    }

    /// 0-based page index, as the document collaborators address pages.
    pub fn zero_based(&self) -> u32 {
        self.index.saturating_sub(1)
    }
}

/// A rectangle in PDF point space, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DocumentRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &DocumentRect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl fmt::Display for DocumentRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}, {:.2}x{:.2}]",
            self.x, self.y, self.width, self.height
        )
    }
}
