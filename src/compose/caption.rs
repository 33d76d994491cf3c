use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::config::CaptionConfig;

const GLYPH_SIZE: u32 = 8;
const ELLIPSIS: &str = "...";

/// How a caption fits into the band: which glyph scale, which lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    pub scale: u32,
    pub lines: Vec<String>,
    /// Set when even the smallest scale could not fit every line.
    pub truncated: bool,
}

impl CaptionLayout {
    fn empty(scale: u32) -> Self {
        Self {
            scale,
            lines: Vec::new(),
            truncated: false,
        }
    }
}

/// Word-wraps `text` to the band, shrinking the glyph scale step by step when
/// the wrapped lines are too many to stack. At scale 1 whatever still does not
/// fit is cut and the last visible line ends in an ellipsis.
pub fn layout(text: &str, band_width: u32, config: &CaptionConfig) -> CaptionLayout {
    let preferred = config.glyph_scale.max(1);
    if text.trim().is_empty() {
        return CaptionLayout::empty(preferred);
    }

    let usable_width = band_width.saturating_sub(2 * config.inset);
    let usable_height = config.band_height.saturating_sub(2 * config.inset);

    let mut last = CaptionLayout::empty(1);
    for scale in (1..=preferred).rev() {
        let max_chars = (usable_width / (GLYPH_SIZE * scale)) as usize;
        let line_height = GLYPH_SIZE * scale + config.line_spacing;
        let max_lines = ((usable_height + config.line_spacing) / line_height) as usize;
        if max_chars == 0 || max_lines == 0 {
            continue;
        }

        let lines = wrap(text, max_chars);
        if lines.len() <= max_lines {
            return CaptionLayout {
                scale,
                lines,
                truncated: false,
            };
        }
        last = CaptionLayout {
            scale,
            lines: truncate(lines, max_lines, max_chars),
            truncated: true,
        };
    }

    if last.lines.is_empty() {
        // Band too small for a single glyph.
        last.truncated = true;
    }
    last
}

/// Greedy word wrap. Newlines start a new paragraph, blank paragraphs are
/// dropped, and words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            if chars.is_empty() {
                continue;
            }

            let needed = if current_len == 0 {
                chars.len()
            } else {
                current_len + 1 + chars.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars.iter());
            current_len += chars.len();
        }

        if current_len > 0 {
            lines.push(current);
        }
    }
    lines
}

fn truncate(mut lines: Vec<String>, max_lines: usize, max_chars: usize) -> Vec<String> {
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let keep = max_chars.saturating_sub(ELLIPSIS.len());
        let mut cut: String = last.chars().take(keep).collect();
        cut.push_str(&ELLIPSIS[..ELLIPSIS.len().min(max_chars)]);
        *last = cut;
    }
    lines
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draws `layout` into `band`, each line centred horizontally and the block
/// centred vertically.
pub fn render(band: &mut RgbImage, layout: &CaptionLayout, config: &CaptionConfig) {
    if layout.lines.is_empty() {
        return;
    }

    let color = Rgb(config.foreground);
    let scale = layout.scale.max(1);
    let cell = GLYPH_SIZE * scale;
    let line_count = layout.lines.len() as u32;
    let block_height = line_count * cell + (line_count - 1) * config.line_spacing;
    let top = band.height().saturating_sub(block_height) / 2;

    for (row, line) in layout.lines.iter().enumerate() {
        let line_width = line.chars().count() as u32 * cell;
        let left = band.width().saturating_sub(line_width) / 2;
        let y = top + row as u32 * (cell + config.line_spacing);

        for (col, c) in line.chars().enumerate() {
            let x = left + col as u32 * cell;
            for (gy, bits) in glyph(c).iter().enumerate() {
                for gx in 0..GLYPH_SIZE {
                    if bits & (1 << gx) == 0 {
                        continue;
                    }
                    let rect = Rect::at(
                        (x + gx * scale) as i32,
                        (y + gy as u32 * scale) as i32,
                    )
                    .of_size(scale, scale);
                    draw_filled_rect_mut(band, rect, color);
                }
            }
        }
    }
}
