use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Which piece of a card was missing when a save was attempted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MissingInput {
    Screenshot,
    Text,
    ScreenshotAndText,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::Screenshot => write!(f, "capture a screenshot first"),
            MissingInput::Text => write!(f, "process some handwriting into text first"),
            MissingInput::ScreenshotAndText => {
                write!(f, "capture a screenshot and process some handwriting first")
            }
        }
    }
}

/// Stable discriminant for UI branching.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    MissingInput,
    RecognitionUnavailable,
    RecognitionFailed,
    CaptureFailed,
    CorruptStore,
    StoreReadError,
    StoreWriteError,
    DuplicateId,
    Codec,
    Cancelled,
}

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Cannot save flashcard: {0}")]
    MissingInput(MissingInput),

    #[error("OCR engine unavailable: {0}")]
    RecognitionUnavailable(String),

    #[error("OCR engine failed: {0}")]
    RecognitionFailed(String),

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Flashcard store at {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read flashcard store at {}: {source}", .path.display())]
    StoreReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A flashcard with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Failed to write flashcard store at {}: {source}", .path.display())]
    StoreWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding failed: {0}")]
    Codec(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl FlashcardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlashcardError::MissingInput(_) => ErrorKind::MissingInput,
            FlashcardError::RecognitionUnavailable(_) => ErrorKind::RecognitionUnavailable,
            FlashcardError::RecognitionFailed(_) => ErrorKind::RecognitionFailed,
            FlashcardError::CaptureFailed(_) => ErrorKind::CaptureFailed,
            FlashcardError::CorruptStore { .. } => ErrorKind::CorruptStore,
            FlashcardError::StoreReadError { .. } => ErrorKind::StoreReadError,
            FlashcardError::StoreWriteError { .. } => ErrorKind::StoreWriteError,
            FlashcardError::DuplicateId(_) => ErrorKind::DuplicateId,
            FlashcardError::Codec(_) => ErrorKind::Codec,
            FlashcardError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlashcardError::StoreReadError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlashcardError::StoreWriteError {
            path: path.into(),
            source,
        }
    }
}

impl From<image::ImageError> for FlashcardError {
    fn from(err: image::ImageError) -> Self {
        FlashcardError::Codec(err.to_string())
    }
}

impl From<base64::DecodeError> for FlashcardError {
    fn from(err: base64::DecodeError) -> Self {
        FlashcardError::Codec(format!("invalid base64 image payload: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
