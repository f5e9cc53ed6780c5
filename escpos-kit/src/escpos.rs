//! ESC/POS command builder
//!
//! [`Encoder`] is the command surface receipt layouts are written against.
//! [`EscPosBuilder`] implements it by appending protocol bytes to a buffer.
//!
//! Style commands are plain toggles: the builder keeps no style state, so a
//! layout that turns bold on must turn it off again.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::encoding::{CodePage, encode_text};
use crate::image_cache::ImageSource;
use crate::raster::{Raster, qr_image};

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Character font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    A,
    B,
}

/// Printer command surface used by receipt layouts
pub trait Encoder {
    /// Reset the printer (ESC @)
    fn init(&mut self);
    fn set_align(&mut self, align: Align);
    fn set_font(&mut self, font: Font);
    fn set_bold(&mut self, on: bool);
    fn set_double_strike(&mut self, on: bool);
    /// Character magnification; each multiplier is 0 (normal) or 1 (double)
    fn set_size(&mut self, width: u8, height: u8);
    fn write(&mut self, text: &str);
    /// Print and feed `lines` lines
    fn feed(&mut self, lines: u8);
    /// Feed to the cutter and partial cut
    fn cut(&mut self);
    /// Print a QR code as a raster image. Empty payloads print nothing.
    fn print_qr_code(&mut self, data: &str);
    /// Print the image behind a URL. Empty URLs print nothing.
    fn print_image(&mut self, url: &str);

    /// Write text followed by newline
    fn line(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Print a full-width line of `ch`
    fn separator(&mut self, ch: char, width: usize) {
        let line: String = std::iter::repeat_n(ch, width).collect();
        self.line(&line);
    }
}

/// ESC/POS byte builder
pub struct EscPosBuilder {
    buf: Vec<u8>,
    code_page: CodePage,
    images: Option<Arc<dyn ImageSource>>,
}

impl EscPosBuilder {
    /// Create an empty builder (UTF-8 text, no image source)
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4096),
            code_page: CodePage::Utf8,
            images: None,
        }
    }

    /// Select the text code page
    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }

    /// Attach the source used by [`Encoder::print_image`]
    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    /// Bytes written so far
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the builder and return the command stream
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a `GS v 0` raster block
    pub fn raster(&mut self, raster: &Raster) -> &mut Self {
        match raster.command_bytes() {
            Ok(cmd) => self.buf.extend_from_slice(&cmd),
            Err(e) => warn!(error = %e, "Skipping raster image"),
        }
        self
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for EscPosBuilder {
    fn init(&mut self) {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        if self.code_page == CodePage::Gbk {
            // FS & - Chinese mode, FS C 1 - GBK
            self.buf.extend_from_slice(&[0x1C, 0x26, 0x1C, 0x43, 0x01]);
        }
    }

    fn set_align(&mut self, align: Align) {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
            Align::Right => 0x02,
        };
        self.buf.extend_from_slice(&[0x1B, 0x61, n]);
    }

    fn set_font(&mut self, font: Font) {
        let n = match font {
            Font::A => 0x00,
            Font::B => 0x01,
        };
        self.buf.extend_from_slice(&[0x1B, 0x4D, n]);
    }

    fn set_bold(&mut self, on: bool) {
        self.buf.extend_from_slice(&[0x1B, 0x45, on as u8]);
    }

    fn set_double_strike(&mut self, on: bool) {
        self.buf.extend_from_slice(&[0x1B, 0x47, on as u8]);
    }

    fn set_size(&mut self, width: u8, height: u8) {
        // GS ! n - height in the high nibble, width in the low nibble
        let w = width.min(1);
        let h = height.min(1);
        self.buf.extend_from_slice(&[0x1D, 0x21, (h << 4) | w]);
    }

    fn write(&mut self, text: &str) {
        self.buf
            .extend_from_slice(&encode_text(self.code_page, text));
    }

    fn feed(&mut self, lines: u8) {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
    }

    fn cut(&mut self) {
        // GS V 66 0 - feed to cutting position, partial cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, 0x00]);
    }

    #[instrument(skip(self))]
    fn print_qr_code(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        // Native GS ( k QR support is patchy across models, so print it as raster
        match qr_image(data) {
            Ok(img) => {
                self.raster(&Raster::from_image(&img));
            }
            Err(e) => warn!(error = %e, "QR code generation failed"),
        }
    }

    #[instrument(skip(self))]
    fn print_image(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }
        let Some(images) = self.images.clone() else {
            warn!("No image source configured, skipping image");
            return;
        };
        match images.load(url) {
            Ok(img) => {
                self.raster(&Raster::from_image(&img));
            }
            Err(e) => warn!(error = %e, "Image unavailable, printing without it"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_cache::ImageCacheError;
    use image::{DynamicImage, GrayImage, Luma};

    struct FixedImage(DynamicImage);

    impl ImageSource for FixedImage {
        fn load(&self, _url: &str) -> Result<DynamicImage, ImageCacheError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenImage;

    impl ImageSource for BrokenImage {
        fn load(&self, _url: &str) -> Result<DynamicImage, ImageCacheError> {
            Err(ImageCacheError::Status(404))
        }
    }

    #[test]
    fn test_command_bytes() {
        let mut b = EscPosBuilder::new();
        b.init();
        b.set_align(Align::Center);
        b.set_align(Align::Right);
        b.set_font(Font::B);
        b.set_bold(true);
        b.set_bold(false);
        b.set_double_strike(true);
        b.set_size(1, 0);
        b.set_size(0, 1);
        b.feed(4);
        b.cut();

        assert_eq!(
            b.into_bytes(),
            vec![
                0x1B, 0x40, //
                0x1B, 0x61, 0x01, //
                0x1B, 0x61, 0x02, //
                0x1B, 0x4D, 0x01, //
                0x1B, 0x45, 0x01, //
                0x1B, 0x45, 0x00, //
                0x1B, 0x47, 0x01, //
                0x1D, 0x21, 0x01, //
                0x1D, 0x21, 0x10, //
                0x1B, 0x64, 0x04, //
                0x1D, 0x56, 0x42, 0x00,
            ]
        );
    }

    #[test]
    fn test_size_clamps_multipliers() {
        let mut b = EscPosBuilder::new();
        b.set_size(7, 3);
        assert_eq!(b.bytes(), &[0x1D, 0x21, 0x11]);
    }

    #[test]
    fn test_line_and_separator() {
        let mut b = EscPosBuilder::new();
        b.line("Tea");
        b.separator('-', 5);
        assert_eq!(b.bytes(), b"Tea\n-----\n");
    }

    #[test]
    fn test_gbk_init_enables_chinese_mode() {
        let mut b = EscPosBuilder::new().with_code_page(CodePage::Gbk);
        b.init();
        b.write("你");
        assert_eq!(&b.bytes()[..7], &[0x1B, 0x40, 0x1C, 0x26, 0x1C, 0x43, 0x01]);
        assert_eq!(b.len(), 9);
    }

    #[test]
    fn test_empty_qr_and_image_emit_nothing() {
        let mut b = EscPosBuilder::new();
        b.print_qr_code("");
        b.print_image("");
        assert!(b.is_empty());
    }

    #[test]
    fn test_qr_code_emits_raster() {
        let mut b = EscPosBuilder::new();
        b.print_qr_code("https://example.com");
        assert_eq!(&b.bytes()[..4], &[0x1D, 0x76, 0x30, 0x00]);
    }

    #[test]
    fn test_image_from_source() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 2, Luma([0])));
        let mut b = EscPosBuilder::new().with_image_source(Arc::new(FixedImage(img)));
        b.print_image("https://example.com/logo.png");
        assert_eq!(
            b.into_bytes(),
            vec![0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_image_failure_is_swallowed() {
        let mut b = EscPosBuilder::new().with_image_source(Arc::new(BrokenImage));
        b.print_image("https://example.com/missing.png");
        b.write("after");
        assert_eq!(b.bytes(), b"after");

        let mut no_source = EscPosBuilder::new();
        no_source.print_image("https://example.com/logo.png");
        assert!(no_source.is_empty());
    }
}
