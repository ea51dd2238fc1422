use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::{info, warn};
use std::path::Path;

/// Extra pixels between lines of multi-line text.
const LINE_SPACING: i32 = 4;
const BITMAP_GLYPH_SIDE: i32 = 8;

/// Typeface used to draw sticker text.
pub enum StickerFont {
    TrueType(FontVec),
    /// Built-in 8x8 ASCII glyphs, used when no TrueType font is available.
    Bitmap,
}

impl StickerFont {
    /// Load a TrueType font, falling back to the bitmap font when `path` cannot be used.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("Cannot read font {:?} ({}), using built-in bitmap font", path, error);
                return StickerFont::Bitmap;
            }
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                info!("Loaded sticker font {:?}", path);
                StickerFont::TrueType(font)
            }
            Err(error) => {
                warn!("Cannot parse font {:?} ({}), using built-in bitmap font", path, error);
                StickerFont::Bitmap
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Lines are split on `\n`.
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        color: Rgb<u8>,
        (x, y): (i32, i32),
        size: f32,
        bold: bool,
        text: &str,
    ) {
        match self {
            StickerFont::TrueType(font) => {
                let scale = PxScale::from(size);
                let line_height = font.as_scaled(scale).height().ceil() as i32 + LINE_SPACING;
                for (row, line) in text.lines().enumerate() {
                    let top = y + row as i32 * line_height;
                    draw_text_mut(canvas, color, x, top, scale, font, line);
                }
            }
            StickerFont::Bitmap => {
                // Whole multiples only, never wider than the requested size.
                let factor = ((size / BITMAP_GLYPH_SIDE as f32).floor() as i32).max(1);
                let line_height = BITMAP_GLYPH_SIDE * factor + LINE_SPACING;
                for (row, line) in text.lines().enumerate() {
                    let top = y + row as i32 * line_height;
                    for (column, ch) in line.chars().enumerate() {
                        let left = x + column as i32 * BITMAP_GLYPH_SIDE * factor;
                        draw_bitmap_glyph(canvas, color, (left, top), factor, ch);
                        if bold {
                            draw_bitmap_glyph(canvas, color, (left + 1, top), factor, ch);
                        }
                    }
                }
            }
        }
    }
}

fn draw_bitmap_glyph(
    canvas: &mut RgbImage,
    color: Rgb<u8>,
    (x, y): (i32, i32),
    factor: i32,
    ch: char,
) {
    let code = if ch.is_ascii() { ch as usize } else { '?' as usize };
    let glyph = font8x8::legacy::BASIC_LEGACY[code];
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for (row, bits) in glyph.iter().enumerate() {
        for column in 0..BITMAP_GLYPH_SIDE {
            if bits & (1 << column) == 0 {
                continue;
            }
            for dy in 0..factor {
                for dx in 0..factor {
                    let px = x + column * factor + dx;
                    let py = y + row as i32 * factor + dy;
                    if (0..width).contains(&px) && (0..height).contains(&py) {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}
