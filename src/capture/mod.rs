#[cfg(feature = "screen-capture")]
pub mod xcap_backend;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use tokio::time::Instant;

#[cfg(feature = "screen-capture")]
pub use xcap_backend::XcapCapture;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Screen-capture collaborator. Implementations block; callers run them on
/// the blocking pool.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self) -> Result<RgbImage>;
}

/// Stand-in used when the crate is built without a capture backend.
pub struct UnsupportedCapture;

impl ScreenCapture for UnsupportedCapture {
    fn capture(&self) -> Result<RgbImage> {
        Err(anyhow!(
            "screen capture is not available in this build (enable the `screen-capture` feature)"
        ))
    }
}

/// Best capture backend compiled into this build.
pub fn default_capture() -> Arc<dyn ScreenCapture> {
    #[cfg(feature = "screen-capture")]
    {
        Arc::new(XcapCapture)
    }

    #[cfg(not(feature = "screen-capture"))]
    {
        Arc::new(UnsupportedCapture)
    }
}

/// Waits `delay` (so the caller's window can hide) and then grabs the screen
/// on the blocking pool.
pub async fn capture_after(capture: Arc<dyn ScreenCapture>, delay: Duration) -> Result<RgbImage> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let start = Instant::now();
    let image = tokio::task::spawn_blocking(move || capture.capture())
        .await
        .context("screen capture worker join failed")??;

    if image.width() == 0 || image.height() == 0 {
        return Err(anyhow!("screen capture returned an empty image"));
    }

    log_info!(
        "Captured {}x{} screenshot in {}ms",
        image.width(),
        image.height(),
        start.elapsed().as_millis()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    struct Solid(u32, u32);

    impl ScreenCapture for Solid {
        fn capture(&self) -> Result<RgbImage> {
            Ok(RgbImage::from_pixel(self.0, self.1, Rgb([10, 20, 30])))
        }
    }

    #[tokio::test]
    async fn returns_captured_image() {
        let image = capture_after(Arc::new(Solid(12, 8)), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (12, 8));
    }

    #[tokio::test]
    async fn empty_capture_is_an_error() {
        assert!(capture_after(Arc::new(Solid(0, 0)), Duration::ZERO)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn unsupported_backend_reports_why() {
        let err = capture_after(Arc::new(UnsupportedCapture), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("screen-capture"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_delay_before_capturing() {
        let start = Instant::now();
        capture_after(Arc::new(Solid(2, 2)), Duration::from_millis(1000))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
