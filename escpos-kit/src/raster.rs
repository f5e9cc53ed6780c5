//! Monochrome raster conversion
//!
//! Turns any decoded image into `GS v 0` raster data:
//! - wider than [`MAX_DOTS`] → Lanczos3 downscale, aspect preserved
//! - 8 pixels per byte, MSB first, `1` = print dot
//! - luma below [`LUMA_THRESHOLD`] prints, transparent pixels never print

use std::borrow::Cow;

use image::{DynamicImage, GenericImageView, Luma, imageops::FilterType};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Widest raster we emit. 384 dots fits 58mm heads and sits centered on 80mm.
pub const MAX_DOTS: u32 = 384;

/// Grayscale midpoint on a 0-255 scale
pub const LUMA_THRESHOLD: u8 = 128;

/// Pixel size of generated QR images
pub const QR_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Image too large for raster command: {width_bytes} bytes x {height} dots")]
    TooLarge { width_bytes: usize, height: usize },

    #[error("QR encode failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

/// Packed 1-bit raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub data: Vec<u8>,
    pub width_bytes: usize,
    pub height: usize,
}

impl Raster {
    /// Fit the image to the print head and pack it
    pub fn from_image(img: &DynamicImage) -> Self {
        Self::pack(&fit_width(img, MAX_DOTS))
    }

    /// Pack an image as-is (no scaling)
    pub fn pack(img: &DynamicImage) -> Self {
        let (w, h) = img.dimensions();
        let width_bytes = w.div_ceil(8) as usize;
        let height = h as usize;
        let mut data = vec![0u8; width_bytes * height];

        let rgba = img.to_rgba8();
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a < 128 {
                continue;
            }
            if luma(r, g, b) < LUMA_THRESHOLD {
                let idx = y as usize * width_bytes + (x / 8) as usize;
                data[idx] |= 0x80 >> (x % 8);
            }
        }

        Self {
            data,
            width_bytes,
            height,
        }
    }

    /// `GS v 0 m xL xH yL yH d1..dk`
    pub fn command_bytes(&self) -> Result<Vec<u8>, RasterError> {
        if self.width_bytes > u16::MAX as usize || self.height > u16::MAX as usize {
            return Err(RasterError::TooLarge {
                width_bytes: self.width_bytes,
                height: self.height,
            });
        }

        let mut out = Vec::with_capacity(8 + self.data.len());
        out.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        out.extend_from_slice(&(self.width_bytes as u16).to_le_bytes());
        out.extend_from_slice(&(self.height as u16).to_le_bytes());
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// ITU-R BT.601 luma in integer arithmetic
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Downscale to `max_width` when wider, keeping the aspect ratio
pub fn fit_width(img: &DynamicImage, max_width: u32) -> Cow<'_, DynamicImage> {
    let (w, h) = img.dimensions();
    if w <= max_width {
        return Cow::Borrowed(img);
    }
    let new_h = ((h as f64 * max_width as f64 / w as f64).round() as u32).max(1);
    Cow::Owned(img.resize_exact(max_width, new_h, FilterType::Lanczos3))
}

/// Render a QR code as a [`QR_SIZE`] grayscale image
pub fn qr_image(payload: &str) -> Result<DynamicImage, RasterError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let img = code
        .render::<Luma<u8>>()
        .max_dimensions(QR_SIZE, QR_SIZE)
        .build();
    Ok(DynamicImage::ImageLuma8(img))
}
