//! Hand-drawn note to flashcard pipeline.
//!
//! Strokes drawn on a canvas are rasterised, binarised and sent to an OCR
//! engine; the recognised text is rendered as a caption under a screenshot and
//! the result is appended to a JSON card store that can be browsed later.

pub mod utils;

pub mod capture;
pub mod compose;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod raster;
pub mod store;

pub use config::{AppConfig, ConfigStore};
pub use error::{ErrorKind, FlashcardError, MissingInput, Result};
pub use pipeline::{Browser, CaptureSession, FlashcardPipeline, PendingTask, SessionPhase};
pub use raster::{PointerEvent, StrokeRaster};
pub use store::{Flashcard, FlashcardStore};

/// Routes `log` output to stderr through `env_logger`. Honors `RUST_LOG`.
pub fn init_logging() {
    utils::logging::init();
}
