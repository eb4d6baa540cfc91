// SPDX-License-Identifier: AGPL-3.0
// Tagmint Core - QR artifact generation
//
// One PNG per item, named by uid, encoding the record's JSON text with a
// "UID: <uid>" caption strip rendered under the QR matrix.

use crate::types::{AppError, Item};
use image::{ImageBuffer, Luma};
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Rendered pixel size of one QR module
const MODULE_PIXELS: u32 = 10;

/// Height of the caption strip under the QR matrix
pub const CAPTION_HEIGHT: u32 = 30;

// Caption glyphs are a built-in 5x7 bitmap set, one byte per row with bit 4
// leftmost. Only the characters appearing in "UID: <digits>" are defined.
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 2;

fn glyph_rows(c: char) -> [u8; 7] {
    match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        ':' => [0b00000, 0b00100, 0b00100, 0b00000, 0b00100, 0b00100, 0b00000],
        _ => [0; 7],
    }
}

/// Writes and removes per-item QR label images under a fixed directory
pub struct QrArtifactStore {
    output_dir: PathBuf,
}

impl QrArtifactStore {
    /// Create the store, ensuring the output directory exists
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .map_err(|e| AppError::ArtifactIo(format!("Failed to create artifact dir: {}", e)))?;
        Ok(Self { output_dir })
    }

    /// Path an item's artifact lives at, derived solely from its uid
    pub fn path_for(&self, uid: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", uid))
    }

    pub fn exists(&self, uid: &str) -> bool {
        self.path_for(uid).exists()
    }

    /// Render the item's JSON form as a QR code with a uid caption below it
    /// and write `<uid>.png`, overwriting any previous artifact for that uid.
    pub fn generate(&self, item: &Item) -> Result<PathBuf, AppError> {
        let payload = serde_json::to_string(item)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize item: {}", e)))?;

        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
            .map_err(|e| AppError::ArtifactIo(format!("QR encoding failed: {}", e)))?;

        let qr = code
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
            .quiet_zone(true)
            .build();

        let (qr_width, qr_height) = qr.dimensions();
        let mut canvas: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(qr_width, qr_height + CAPTION_HEIGHT, Luma([255]));
        image::imageops::replace(&mut canvas, &qr, 0, 0);
        draw_caption(&mut canvas, &format!("UID: {}", item.uid), qr_height);

        let path = self.path_for(&item.uid);
        canvas
            .save(&path)
            .map_err(|e| AppError::ArtifactIo(format!("Failed to write artifact: {}", e)))?;

        tracing::info!("Wrote QR artifact {:?}", path);
        Ok(path)
    }

    /// Delete an item's artifact. A missing file is not an error.
    pub fn remove(&self, uid: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(uid)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::ArtifactIo(format!(
                "Failed to remove artifact: {}",
                e
            ))),
        }
    }
}

/// Draw scaled bitmap text centered in the caption strip starting at `top`
fn draw_caption(canvas: &mut ImageBuffer<Luma<u8>, Vec<u8>>, text: &str, top: u32) {
    let advance = (GLYPH_WIDTH + 1) * GLYPH_SCALE;
    let text_width = advance * text.chars().count() as u32;
    let x0 = canvas.width().saturating_sub(text_width) / 2;
    let y0 = top + CAPTION_HEIGHT.saturating_sub(GLYPH_HEIGHT * GLYPH_SCALE) / 2;

    for (index, c) in text.chars().enumerate() {
        let rows = glyph_rows(c);
        let gx = x0 + advance * index as u32;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let x = gx + col * GLYPH_SCALE + dx;
                        let y = y0 + row as u32 * GLYPH_SCALE + dy;
                        if x < canvas.width() && y < canvas.height() {
                            canvas.put_pixel(x, y, Luma([0]));
                        }
                    }
                }
            }
        }
    }
}
