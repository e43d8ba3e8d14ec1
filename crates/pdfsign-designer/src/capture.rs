//! Freehand signature capture.
//!
//! A [`CaptureSurface`] records pointer strokes on a fixed-resolution pixmap
//! and exports them as a transparent RGBA PNG ([`SignatureAsset`]). Rendering
//! uses tiny-skia with round caps and joins so short segments read as one
//! smooth line.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use pdfsign_core::constants::{INK_RGBA, INK_WIDTH};
use pdfsign_core::{Dimensions, Error, Position, Result};
use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

/// A captured signature: PNG bytes with an alpha channel plus pixel size.
///
/// Immutable once created. The aspect ratio derived from it constrains every
/// later resize of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureAsset {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl SignatureAsset {
    /// Wraps already-encoded PNG bytes of the given pixel size.
    pub fn new(png: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if png.is_empty() {
            return Err(Error::invalid_input("signature image is empty"));
        }
        Dimensions::new(width as f64, height as f64).validated("signature image")?;
        Ok(Self { png, width, height })
    }

    /// Loads a signature from an existing image file (PNG, JPEG, ...).
    ///
    /// The image is re-encoded as RGBA PNG so the document mutator always
    /// receives the same format.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_input("signature image is empty"));
        }
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| Error::invalid_input(format!("unreadable signature image: {e}")))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|e| Error::other(format!("failed to encode signature: {e}")))?;

        Self::new(encoded.into_inner(), width, height)
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width as f64, self.height as f64)
    }

    /// Width divided by height of the captured image.
    pub fn aspect_ratio(&self) -> f64 {
        self.dimensions().aspect_ratio()
    }
}

fn ink_paint() -> Paint<'static> {
    let [r, g, b, a] = INK_RGBA;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn ink_stroke() -> Stroke {
    Stroke {
        width: INK_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Drawing pad that turns pointer input into a signature raster.
///
/// Input points are in client (viewport) space; they are translated by the
/// surface's client origin into logical surface space. The backing pixmap is
/// `logical size x device pixel ratio` so strokes stay sharp on dense screens.
#[derive(Debug, Clone)]
pub struct CaptureSurface {
    logical: Dimensions,
    pixel_ratio: f64,
    client_origin: Position,
    pixmap: Pixmap,
    strokes: Vec<Vec<Position>>,
    active: bool,
    has_ink: bool,
}

impl CaptureSurface {
    /// Creates a surface of `width x height` logical pixels at `device_pixel_ratio`.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Result<Self> {
        let logical = Dimensions::new(width, height).validated("capture surface")?;
        if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
            return Err(Error::invalid_dimensions(
                "device pixel ratio",
                device_pixel_ratio,
                device_pixel_ratio,
            ));
        }

        let pixel_width = (logical.width * device_pixel_ratio).round().max(1.0) as u32;
        let pixel_height = (logical.height * device_pixel_ratio).round().max(1.0) as u32;
        let pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
            Error::invalid_dimensions("capture pixmap", pixel_width as f64, pixel_height as f64)
        })?;

        debug!(
            "Capture surface {} logical, {}x{} px (ratio {})",
            logical, pixel_width, pixel_height, device_pixel_ratio
        );

        Ok(Self {
            logical,
            pixel_ratio: device_pixel_ratio,
            client_origin: Position::default(),
            pixmap,
            strokes: Vec::new(),
            active: false,
            has_ink: false,
        })
    }

    /// Sets where the surface's top-left corner sits in client space.
    pub fn set_client_origin(&mut self, origin: Position) {
        self.client_origin = origin;
    }

    /// Logical size of the surface.
    pub fn logical_size(&self) -> Dimensions {
        self.logical
    }

    /// Size of the backing pixmap in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_stroking(&self) -> bool {
        self.active
    }

    /// Returns true once anything has been drawn since the last clear.
    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    fn to_surface(&self, client: Position) -> Position {
        client.relative_to(&self.client_origin)
    }

    fn transform(&self) -> Transform {
        let ratio = self.pixel_ratio as f32;
        Transform::from_scale(ratio, ratio)
    }

    /// Starts a stroke at `client_point` and leaves a dot there.
    pub fn begin_stroke(&mut self, client_point: Position) {
        let point = self.to_surface(client_point);
        let transform = self.transform();

        if let Some(dot) = PathBuilder::from_circle(point.x as f32, point.y as f32, INK_WIDTH / 2.0) {
            self.pixmap
                .fill_path(&dot, &ink_paint(), FillRule::Winding, transform, None);
        }

        self.strokes.push(vec![point]);
        self.active = true;
        self.has_ink = true;
    }

    /// Extends the active stroke to `client_point`. Ignored outside a stroke.
    pub fn extend_stroke(&mut self, client_point: Position) {
        if !self.active {
            return;
        }
        let point = self.to_surface(client_point);
        let transform = self.transform();

        let Some(stroke) = self.strokes.last_mut() else {
            return;
        };
        let Some(last) = stroke.last().copied() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(last.x as f32, last.y as f32);
        pb.line_to(point.x as f32, point.y as f32);
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &ink_paint(), &ink_stroke(), transform, None);
        }
        stroke.push(point);
    }

    /// Ends the active stroke. Ignored outside a stroke.
    pub fn end_stroke(&mut self) {
        if self.active {
            self.active = false;
            debug!(
                "Stroke {} finished with {} points",
                self.strokes.len(),
                self.strokes.last().map_or(0, Vec::len)
            );
        }
    }

    /// Wipes the bitmap and all recorded strokes.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.strokes.clear();
        self.active = false;
        self.has_ink = false;
    }

    /// Rasterizes the current ink to a transparent PNG.
    ///
    /// Callers must only export when [`has_ink`](Self::has_ink) is true; an
    /// empty pad is refused with `InvalidInput`.
    pub fn export(&self) -> Result<SignatureAsset> {
        if !self.has_ink {
            return Err(Error::invalid_input("signature pad is empty"));
        }
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| Error::other(format!("failed to encode signature: {e}")))?;
        SignatureAsset::new(png, self.pixmap.width(), self.pixmap.height())
    }

    /// Returns the alpha value of the device pixel at `(x, y)`.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }
}
