//! Flashcard workflow: capture a screenshot, draw, recognise, save, browse.
//!
//! The UI owns a [`CaptureSession`] and hands it to each operation. Slow stages
//! (screen capture and OCR) run on tokio's blocking pool behind a
//! [`PendingTask`]; while one is pending the session reports a processing
//! phase. Results are applied to the session only when the task is finished
//! through the pipeline, so an abandoned task never touches it.

pub mod browser;
pub mod session;
pub mod task;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use image::RgbImage;

use crate::capture::{self, ScreenCapture};
use crate::compose;
use crate::config::AppConfig;
use crate::error::{FlashcardError, MissingInput, Result};
use crate::metrics::{MetricsCollector, RecognitionMetrics, SaveMetrics};
use crate::ocr::{OcrAdapter, TesseractEngine};
use crate::preprocess::preprocess;
use crate::store::{Flashcard, FlashcardStore};

pub use browser::Browser;
pub use session::{CaptureSession, SessionPhase};
pub use task::PendingTask;

use task::join_error;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Clone)]
pub struct FlashcardPipeline {
    config: AppConfig,
    ocr: OcrAdapter,
    capture: Arc<dyn ScreenCapture>,
    store: FlashcardStore,
    metrics: MetricsCollector,
}

impl FlashcardPipeline {
    /// Wires the pipeline and makes sure the store exists.
    pub fn new(
        config: AppConfig,
        ocr: OcrAdapter,
        capture: Arc<dyn ScreenCapture>,
        store: FlashcardStore,
    ) -> Result<Self> {
        store.ensure()?;
        log_info!(
            "Flashcard pipeline ready (ocr: {}, store: {})",
            ocr.engine_name(),
            store.path().display()
        );
        Ok(Self {
            config,
            ocr,
            capture,
            store,
            metrics: MetricsCollector::new(),
        })
    }

    /// Tesseract, the build's capture backend and the store in the resolved
    /// data directory.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let ocr = OcrAdapter::new(Arc::new(TesseractEngine::new(&config.ocr)));
        let store = FlashcardStore::in_dir(config.resolve_data_dir());
        Self::new(config, ocr, capture::default_capture(), store)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &FlashcardStore {
        &self.store
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn new_session(&self) -> CaptureSession {
        CaptureSession::new(&self.config.canvas)
    }

    /// Starts a screen capture after the configured delay.
    pub fn spawn_capture(&self, session: &mut CaptureSession) -> PendingTask<RgbImage> {
        session.set_phase(SessionPhase::Capturing);
        let capture = Arc::clone(&self.capture);
        let delay = Duration::from_millis(self.config.capture.delay_ms);

        PendingTask::spawn(async move {
            capture::capture_after(capture, delay)
                .await
                .map_err(|err| FlashcardError::CaptureFailed(format!("{err:#}")))
        })
    }

    /// Applies a finished capture to the session. A failed or cancelled
    /// capture keeps whatever screenshot the session already had.
    pub async fn finish_capture(
        &self,
        session: &mut CaptureSession,
        task: PendingTask<RgbImage>,
    ) -> Result<()> {
        let result = task.wait().await;
        session.set_phase(SessionPhase::Ready);
        match result {
            Ok(screenshot) => {
                session.set_screenshot(screenshot);
                Ok(())
            }
            Err(err) => {
                log_warn!("Screenshot not taken: {err}");
                Err(err)
            }
        }
    }

    pub async fn capture_screenshot(&self, session: &mut CaptureSession) -> Result<()> {
        let task = self.spawn_capture(session);
        self.finish_capture(session, task).await
    }

    /// Snapshots the drawing and starts preprocessing plus OCR on it. Strokes
    /// added afterwards do not affect this run.
    pub fn spawn_recognition(&self, session: &mut CaptureSession) -> PendingTask<String> {
        session.set_phase(SessionPhase::Recognizing);
        let snapshot = session.raster().snapshot();
        let ocr = self.ocr.clone();
        let metrics = self.metrics.clone();

        PendingTask::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                let binary = preprocess(&snapshot);
                let preprocess_ms = start.elapsed().as_millis() as u64;
                let ink_pixels = binary.ink_pixels();
                log_info!(
                    "Preprocessed {}x{} drawing in {}ms (otsu level {:?}, {} ink px)",
                    binary.width(),
                    binary.height(),
                    preprocess_ms,
                    binary.level(),
                    ink_pixels
                );

                let ocr_start = Instant::now();
                let text = ocr.recognize(&binary)?;
                Ok::<_, FlashcardError>((
                    text.clone(),
                    RecognitionMetrics {
                        timestamp: Utc::now(),
                        preprocess_ms,
                        ocr_ms: ocr_start.elapsed().as_millis() as u64,
                        ink_pixels,
                        chars: text.chars().count(),
                    },
                ))
            })
            .await
            .map_err(join_error)?;

            match outcome {
                Ok((text, stats)) => {
                    metrics.record_recognition(stats).await;
                    Ok(text)
                }
                Err(err) => {
                    metrics.record_failure().await;
                    Err(err)
                }
            }
        })
    }

    /// Stores the recognised text on the session. On error or cancellation
    /// the previous text is kept.
    pub async fn finish_recognition(
        &self,
        session: &mut CaptureSession,
        task: PendingTask<String>,
    ) -> Result<String> {
        let result = task.wait().await;
        session.set_phase(SessionPhase::Ready);
        match result {
            Ok(text) => {
                session.set_text(text.clone());
                Ok(text)
            }
            Err(err) => {
                log_warn!("Recognition did not complete: {err}");
                Err(err)
            }
        }
    }

    pub async fn recognize(&self, session: &mut CaptureSession) -> Result<String> {
        let task = self.spawn_recognition(session);
        self.finish_recognition(session, task).await
    }

    /// Composes, encodes and appends a card from the session, then resets the
    /// session for the next card.
    ///
    /// Needs a screenshot and non-blank text; nothing is written otherwise.
    pub async fn save(&self, session: &mut CaptureSession) -> Result<Flashcard> {
        let text = session.text().map(str::trim).unwrap_or_default().to_string();
        let screenshot = match (session.screenshot(), text.is_empty()) {
            (Some(screenshot), false) => screenshot.clone(),
            (None, false) => return Err(reject_save(MissingInput::Screenshot)),
            (Some(_), true) => return Err(reject_save(MissingInput::Text)),
            (None, true) => return Err(reject_save(MissingInput::ScreenshotAndText)),
        };

        let store = self.store.clone();
        let caption = self.config.caption.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let artifact = compose::compose(&screenshot, &text, &caption);
            let compose_ms = start.elapsed().as_millis() as u64;

            let encode_start = Instant::now();
            let image = compose::encode(&artifact)?;
            let encode_ms = encode_start.elapsed().as_millis() as u64;
            let image_bytes = image.len();

            let write_start = Instant::now();
            let card = store.create(image, text, Utc::now())?;
            let store_write_ms = write_start.elapsed().as_millis() as u64;

            Ok::<_, FlashcardError>((
                card,
                SaveMetrics {
                    timestamp: Utc::now(),
                    compose_ms,
                    encode_ms,
                    store_write_ms,
                    total_ms: start.elapsed().as_millis() as u64,
                    image_bytes,
                },
            ))
        })
        .await
        .map_err(join_error)?;

        match outcome {
            Ok((card, stats)) => {
                log_info!(
                    "Flashcard {} saved: compose {}ms, encode {}ms, write {}ms",
                    card.id,
                    stats.compose_ms,
                    stats.encode_ms,
                    stats.store_write_ms
                );
                self.metrics.record_save(stats).await;
                session.reset();
                Ok(card)
            }
            Err(err) => {
                log_error!("Failed to save flashcard: {err}");
                self.metrics.record_failure().await;
                Err(err)
            }
        }
    }

    /// Loads the collection for browsing, oldest card first.
    pub fn browse(&self) -> Result<Browser> {
        let cards = self.store.load_all()?;
        if cards.is_empty() {
            log_info!("No flashcards found in {}", self.store.path().display());
        }
        Ok(Browser::new(cards))
    }
}

fn reject_save(missing: MissingInput) -> FlashcardError {
    log_warn!("Save rejected: {missing}");
    FlashcardError::MissingInput(missing)
}
