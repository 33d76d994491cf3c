use image::RgbImage;
use serde::Serialize;

use crate::config::CanvasConfig;
use crate::raster::{PenState, PointerEvent, StrokeRaster};

/// What a session is waiting on. The UI shows a busy indicator for anything
/// other than `Ready`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    #[default]
    Ready,
    Capturing,
    Recognizing,
}

/// Everything one "new flashcard" window accumulates before it is saved.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    canvas: CanvasConfig,
    raster: StrokeRaster,
    pen: PenState,
    screenshot: Option<RgbImage>,
    text: Option<String>,
    phase: SessionPhase,
}

impl CaptureSession {
    pub fn new(canvas: &CanvasConfig) -> Self {
        Self {
            canvas: canvas.clone(),
            raster: StrokeRaster::from_config(canvas),
            pen: PenState::default(),
            screenshot: None,
            text: None,
            phase: SessionPhase::Ready,
        }
    }

    /// Feeds one pointer event to the pen. Returns true when ink was laid down.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        self.pen.handle(event, &mut self.raster)
    }

    /// Wipes the canvas. Text recognised from the old drawing goes with it.
    pub fn clear_drawing(&mut self) {
        self.raster.clear();
        self.pen.reset();
        self.text = None;
    }

    /// Replaces the recognised text, e.g. after the user corrected it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn screenshot(&self) -> Option<&RgbImage> {
        self.screenshot.as_ref()
    }

    pub fn raster(&self) -> &StrokeRaster {
        &self.raster
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_processing(&self) -> bool {
        self.phase != SessionPhase::Ready
    }

    /// Back to a blank canvas with no screenshot or text.
    pub fn reset(&mut self) {
        *self = Self::new(&self.canvas);
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_screenshot(&mut self, screenshot: RgbImage) {
        self.screenshot = Some(screenshot);
    }
}
