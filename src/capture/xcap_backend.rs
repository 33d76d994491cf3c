//! Screen capture via the xcap crate.
//!
//! Every monitor is captured and placed side by side, the same way a
//! full-desktop screenshot tool would.

use anyhow::{bail, Result};
use image::{imageops, DynamicImage, ImageBuffer, Rgba, RgbImage};
use xcap::Monitor;

use super::ScreenCapture;

pub struct XcapCapture;

impl ScreenCapture for XcapCapture {
    fn capture(&self) -> Result<RgbImage> {
        let monitors = Monitor::all()?;
        if monitors.is_empty() {
            bail!("No monitors detected");
        }

        let mut total_width: u32 = 0;
        let mut max_height: u32 = 0;
        for monitor in &monitors {
            total_width += monitor.width()?;
            max_height = max_height.max(monitor.height()?);
        }

        let mut composite = ImageBuffer::from_pixel(total_width, max_height, Rgba([0, 0, 0, 255]));
        let mut x_offset = 0i64;
        for monitor in monitors {
            let shot = monitor.capture_image()?;
            imageops::overlay(&mut composite, &shot, x_offset, 0);
            x_offset += i64::from(shot.width());
        }

        Ok(DynamicImage::ImageRgba8(composite).to_rgb8())
    }
}
