//! Scripted signatures.
//!
//! A stroke script is JSON: an array of strokes, each an array of `[x, y]`
//! points in capture-pad pixels. Replaying it through a [`CaptureSurface`]
//! produces the same asset a user drawing those strokes would.

use pdfsign_core::{Error, Position, Result};
use pdfsign_designer::{CaptureSurface, SignatureAsset};
use pdfsign_settings::CaptureSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeScript {
    strokes: Vec<Vec<[f64; 2]>>,
}

impl StrokeScript {
    pub fn new(strokes: Vec<Vec<[f64; 2]>>) -> Self {
        Self { strokes }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::invalid_input(format!("unreadable stroke script: {e}")))
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Replays the strokes onto `surface`, from its current state.
    pub fn replay(&self, surface: &mut CaptureSurface) {
        for stroke in self.strokes.iter().filter(|s| !s.is_empty()) {
            let mut points = stroke.iter().map(|[x, y]| Position::new(*x, *y));
            if let Some(first) = points.next() {
                surface.begin_stroke(first);
            }
            for point in points {
                surface.extend_stroke(point);
            }
            surface.end_stroke();
        }
    }

    /// Draws the script on a fresh pad sized by `settings` and exports it.
    pub fn to_asset(&self, settings: &CaptureSettings) -> Result<SignatureAsset> {
        let mut surface =
            CaptureSurface::new(settings.width, settings.height, settings.device_pixel_ratio)?;
        self.replay(&mut surface);
        debug!("Replayed {} strokes", self.strokes.len());
        surface.export()
    }
}
