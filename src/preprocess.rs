use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;

pub const INK: u8 = 255;
pub const PAPER: u8 = 0;

/// Two-level image handed to the OCR engine: ink pixels are `INK`, everything
/// else is `PAPER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    pixels: GrayImage,
    /// Otsu level the image was split at; `None` when the source had a single
    /// intensity and nothing could be separated.
    level: Option<u8>,
}

impl BinaryImage {
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> GrayImage {
        self.pixels
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn ink_pixels(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[0] == INK).count()
    }

    pub fn is_blank(&self) -> bool {
        self.ink_pixels() == 0
    }
}

/// Luma conversion followed by an inverted Otsu threshold: pixels darker than
/// or equal to the computed level become ink.
pub fn preprocess(snapshot: &RgbImage) -> BinaryImage {
    let gray = imageops::grayscale(snapshot);

    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if gray.width() == 0 || gray.height() == 0 || min == max {
        return BinaryImage {
            pixels: GrayImage::from_pixel(gray.width(), gray.height(), Luma([PAPER])),
            level: None,
        };
    }

    let level = otsu_level(&gray);
    let pixels = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > level {
            Luma([PAPER])
        } else {
            Luma([INK])
        }
    });

    BinaryImage {
        pixels,
        level: Some(level),
    }
}
