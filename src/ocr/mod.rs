//! OCR engine seam.
//!
//! The engine itself is an external collaborator; [`OcrAdapter`] is the only
//! thing the pipeline talks to. It owns whitespace normalisation and maps
//! engine failures onto the crate's error taxonomy so that "no engine" and
//! "engine saw nothing" stay distinguishable.

pub mod tesseract;

use std::sync::Arc;
use std::time::Instant;

use image::GrayImage;
use thiserror::Error;

use crate::error::{FlashcardError, Result};
use crate::preprocess::BinaryImage;

pub use tesseract::TesseractEngine;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Engine missing, not installed, or unable to initialise.
    #[error("{0}")]
    Unavailable(String),
    /// Engine ran but could not produce a result.
    #[error("{0}")]
    Failed(String),
}

pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Raw engine output; may contain surrounding whitespace.
    fn recognize(&self, image: &GrayImage) -> std::result::Result<String, EngineError>;
}

#[derive(Clone)]
pub struct OcrAdapter {
    engine: Arc<dyn OcrEngine>,
}

impl OcrAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Blocking; run it off the UI path.
    pub fn recognize(&self, image: &BinaryImage) -> Result<String> {
        let start = Instant::now();
        let raw = self.engine.recognize(image.pixels()).map_err(|err| {
            log_warn!(
                "{} failed after {}ms: {err}",
                self.engine.name(),
                start.elapsed().as_millis()
            );
            match err {
                EngineError::Unavailable(msg) => FlashcardError::RecognitionUnavailable(msg),
                EngineError::Failed(msg) => FlashcardError::RecognitionFailed(msg),
            }
        })?;

        let text = raw.trim().to_string();
        log_info!(
            "{} recognized {} chars in {}ms",
            self.engine.name(),
            text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}
