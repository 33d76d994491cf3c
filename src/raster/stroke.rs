use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, BresenhamLineIter};

use crate::config::CanvasConfig;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub width: u32,
    pub color: Rgb<u8>,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 2,
            color: Rgb([0, 0, 0]),
        }
    }
}

/// Bitmap the drawing surface's strokes are replayed into.
#[derive(Debug, Clone)]
pub struct StrokeRaster {
    pixels: RgbImage,
    pen: Pen,
}

impl StrokeRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pen(width, height, Pen::default())
    }

    pub fn with_pen(width: u32, height: u32, pen: Pen) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, BACKGROUND),
            pen,
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::with_pen(
            config.width,
            config.height,
            Pen {
                width: config.stroke_width,
                color: Rgb(config.stroke_color),
            },
        )
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| *p == BACKGROUND)
    }

    /// Draws a straight stroke between two points. Segments reaching outside
    /// the raster are clipped to it; a segment entirely outside draws nothing.
    pub fn append_segment(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let width = self.pen.width.max(1);
        let radius = (width / 2) as i32;
        // Clip against the raster grown by the pen radius so round caps that
        // overlap the border still get drawn.
        let margin = radius as f32 + 1.0;
        let bounds = (
            -margin,
            -margin,
            self.pixels.width() as f32 - 1.0 + margin,
            self.pixels.height() as f32 - 1.0 + margin,
        );
        let Some((start, end)) = clip_segment(
            (x0 as f32, y0 as f32),
            (x1 as f32, y1 as f32),
            bounds,
        ) else {
            return;
        };

        if width == 1 {
            draw_line_segment_mut(&mut self.pixels, start, end, self.pen.color);
            return;
        }

        for point in BresenhamLineIter::new(start, end) {
            draw_filled_circle_mut(&mut self.pixels, point, radius, self.pen.color);
        }
        // The iterator stops short of the end point.
        draw_filled_circle_mut(
            &mut self.pixels,
            (end.0.round() as i32, end.1.round() as i32),
            radius,
            self.pen.color,
        );
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    /// Independent copy; later strokes never show up in it.
    pub fn snapshot(&self) -> RgbImage {
        self.pixels.clone()
    }
}

/// Liang-Barsky clipping of a segment to `(min_x, min_y, max_x, max_y)`.
fn clip_segment(
    start: (f32, f32),
    end: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if min_x > max_x || min_y > max_y {
        return None;
    }

    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, start.0 - min_x),
        (dx, max_x - start.0),
        (-dy, start.1 - min_y),
        (dy, max_y - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (start.0 + t0 * dx, start.1 + t0 * dy),
        (start.0 + t1 * dx, start.1 + t1 * dy),
    ))
}
