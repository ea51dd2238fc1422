pub mod font;
pub mod qr;

use anyhow::{Context, Result};
use image::imageops;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::models::Registration;
pub use font::StickerFont;
use qr::generate_qr_image;

pub const STICKER_WIDTH: u32 = 450;
pub const STICKER_HEIGHT: u32 = 225;
pub const QR_SIDE: u32 = 150;
pub const QR_OFFSET: (i64, i64) = (20, 35);

const LABEL_POSITION: (i32, i32) = (190, 60);
const LABEL_SIZE: f32 = 18.0;
const CAPTION_POSITION: (i32, i32) = (300, 200);
const CAPTION_SIZE: f32 = 12.0;
pub const CAPTION: &str = "Developed by SDP";

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders the printable identification sticker for a registration.
///
/// Output depends only on the registration and the font chosen at
/// construction, so repeated renders produce identical PNG bytes.
pub struct StickerRenderer {
    font: StickerFont,
}

impl StickerRenderer {
    pub fn new(font: StickerFont) -> Self {
        Self { font }
    }

    pub fn from_font_path(path: &Path) -> Self {
        Self::new(StickerFont::load(path))
    }

    pub fn render(&self, registration: &Registration) -> Result<Vec<u8>> {
        let qr = generate_qr_image(&registration.qr_payload(), QR_SIDE)?;

        let mut canvas = RgbImage::from_pixel(STICKER_WIDTH, STICKER_HEIGHT, BACKGROUND);
        imageops::overlay(&mut canvas, &qr, QR_OFFSET.0, QR_OFFSET.1);

        let label = format!("Vehicle No:\n{}", registration.vehicle_number);
        self.font
            .draw(&mut canvas, FOREGROUND, LABEL_POSITION, LABEL_SIZE, true, &label);
        self.font
            .draw(&mut canvas, FOREGROUND, CAPTION_POSITION, CAPTION_SIZE, false, CAPTION);

        let mut output = Cursor::new(Vec::new());
        canvas
            .write_to(&mut output, ImageFormat::Png)
            .context("failed to encode sticker as PNG")?;
        Ok(output.into_inner())
    }
}
