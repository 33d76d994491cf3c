//! Card artifact composition: screenshot on top, caption band below.

pub mod caption;
pub mod codec;

use image::{imageops, imageops::FilterType, Rgb, RgbImage};

use crate::config::CaptionConfig;

pub use caption::{layout, CaptionLayout};
pub use codec::{decode, decode_png, encode, encode_png};

/// Stacks `screenshot` above a `band_height` caption band holding `text`.
///
/// The result is always `screenshot.width()` wide and
/// `screenshot.height() + band_height` tall; empty text leaves the band blank.
pub fn compose(screenshot: &RgbImage, text: &str, config: &CaptionConfig) -> RgbImage {
    let width = screenshot.width();
    let mut band = RgbImage::from_pixel(width, config.band_height, Rgb(config.background));
    let caption = caption::layout(text, width, config);
    if caption.truncated {
        log::warn!(
            "Caption of {} chars does not fit a {}x{} band; showing {} lines",
            text.chars().count(),
            width,
            config.band_height,
            caption.lines.len()
        );
    }
    caption::render(&mut band, &caption, config);

    let mut artifact = RgbImage::new(width, screenshot.height() + config.band_height);
    imageops::replace(&mut artifact, screenshot, 0, 0);
    imageops::replace(&mut artifact, &band, 0, i64::from(screenshot.height()));
    artifact
}

/// Scales an artifact down to at most `max_width` pixels wide, keeping the
/// aspect ratio. Never scales up.
pub fn fit_to_width(image: &RgbImage, max_width: u32) -> RgbImage {
    if max_width == 0 || image.width() <= max_width {
        return image.clone();
    }
    let ratio = f64::from(max_width) / f64::from(image.width());
    let height = ((f64::from(image.height()) * ratio).round() as u32).max(1);
    imageops::resize(image, max_width, height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screenshot(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]))
    }

    #[test]
    fn artifact_dimensions() {
        let config = CaptionConfig::default();
        for (w, h) in [(1, 1), (64, 48), (640, 480), (13, 200)] {
            let artifact = compose(&screenshot(w, h), "A", &config);
            assert_eq!(artifact.dimensions(), (w, h + config.band_height));
        }
    }

    #[test]
    fn screenshot_is_copied_verbatim_on_top() {
        let shot = screenshot(80, 40);
        let artifact = compose(&shot, "hi", &CaptionConfig::default());
        let top = imageops::crop_imm(&artifact, 0, 0, 80, 40).to_image();
        assert_eq!(top, shot);
    }

    #[test]
    fn empty_text_leaves_band_blank() {
        let config = CaptionConfig::default();
        let artifact = compose(&screenshot(120, 30), "", &config);
        let band = imageops::crop_imm(&artifact, 0, 30, 120, config.band_height).to_image();
        assert!(band.pixels().all(|p| p.0 == config.background));
    }

    #[test]
    fn text_inks_the_band() {
        let config = CaptionConfig::default();
        let artifact = compose(&screenshot(120, 30), "A", &config);
        let band = imageops::crop_imm(&artifact, 0, 30, 120, config.band_height).to_image();
        assert!(band.pixels().any(|p| p.0 == config.foreground));
    }

    #[test]
    fn fit_to_width_keeps_aspect() {
        let scaled = fit_to_width(&screenshot(800, 400), 200);
        assert_eq!(scaled.dimensions(), (200, 100));
        let untouched = fit_to_width(&screenshot(100, 50), 200);
        assert_eq!(untouched.dimensions(), (100, 50));
    }
}
