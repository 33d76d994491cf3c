mod types;

pub use types::{MetricsSnapshot, RecognitionMetrics, SaveMetrics};

use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_RECENT: usize = 20;

/// Per-stage timings for the last few pipeline runs. Cheap to clone; clones
/// share the same counters.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

#[derive(Default)]
struct MetricsState {
    recent_recognitions: Vec<RecognitionMetrics>,
    recent_saves: Vec<SaveMetrics>,
    recognition_count: u64,
    save_count: u64,
    failure_count: u64,
}

fn push_bounded<T>(items: &mut Vec<T>, item: T) {
    items.push(item);
    if items.len() > MAX_RECENT {
        items.remove(0);
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_recognition(&self, metrics: RecognitionMetrics) {
        let mut state = self.inner.lock().await;
        state.recognition_count += 1;
        push_bounded(&mut state.recent_recognitions, metrics);
    }

    pub async fn record_save(&self, metrics: SaveMetrics) {
        let mut state = self.inner.lock().await;
        state.save_count += 1;
        push_bounded(&mut state.recent_saves, metrics);
    }

    /// Counts a recognition or save that ended in an error.
    pub async fn record_failure(&self) {
        self.inner.lock().await.failure_count += 1;
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().await;
        MetricsSnapshot {
            recent_recognitions: state.recent_recognitions.clone(),
            recent_saves: state.recent_saves.clone(),
            recognition_count: state.recognition_count,
            save_count: state.save_count,
            failure_count: state.failure_count,
        }
    }

    pub async fn reset(&self) {
        *self.inner.lock().await = MetricsState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn recognition(ocr_ms: u64) -> RecognitionMetrics {
        RecognitionMetrics {
            timestamp: Utc::now(),
            preprocess_ms: 1,
            ocr_ms,
            ink_pixels: 10,
            chars: 1,
        }
    }

    #[tokio::test]
    async fn keeps_only_recent_entries() {
        let metrics = MetricsCollector::new();
        for i in 0..25 {
            metrics.record_recognition(recognition(i)).await;
        }

        let snapshot = metrics.get_snapshot().await;
        assert_eq!(snapshot.recognition_count, 25);
        assert_eq!(snapshot.recent_recognitions.len(), MAX_RECENT);
        assert_eq!(snapshot.recent_recognitions[0].ocr_ms, 5);
    }

    #[tokio::test]
    async fn clones_share_state_and_reset_clears() {
        let metrics = MetricsCollector::new();
        let other = metrics.clone();
        other.record_failure().await;
        other.record_recognition(recognition(3)).await;
        assert_eq!(metrics.get_snapshot().await.failure_count, 1);

        metrics.reset().await;
        assert_eq!(other.get_snapshot().await, MetricsSnapshot::default());
    }
}
