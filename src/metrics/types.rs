use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionMetrics {
    pub timestamp: DateTime<Utc>,
    pub preprocess_ms: u64,
    pub ocr_ms: u64,
    pub ink_pixels: usize,
    pub chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveMetrics {
    pub timestamp: DateTime<Utc>,
    pub compose_ms: u64,
    pub encode_ms: u64,
    pub store_write_ms: u64,
    pub total_ms: u64,
    /// Length of the base64 payload written to the store.
    pub image_bytes: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recent_recognitions: Vec<RecognitionMetrics>,
    pub recent_saves: Vec<SaveMetrics>,
    pub recognition_count: u64,
    pub save_count: u64,
    pub failure_count: u64,
}
