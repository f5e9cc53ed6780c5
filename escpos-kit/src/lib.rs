//! # escpos-kit
//!
//! ESC/POS thermal printer toolkit - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building (`Encoder` / `EscPosBuilder`)
//! - Monochrome raster conversion for logos and QR codes
//! - URL image download with a content-addressed disk cache
//! - Printer transports: CUPS `lp`, Windows spooler, raw TCP (port 9100)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Bill and kitchen ticket layouts → print-bridge
//!
//! ## Example
//!
//! ```ignore
//! use escpos_kit::{Align, EscPosBuilder, Encoder};
//!
//! let mut b = EscPosBuilder::new();
//! b.init();
//! b.set_align(Align::Center);
//! b.set_size(1, 1);
//! b.line("KOT");
//! b.set_size(0, 0);
//! b.feed(3);
//! b.cut();
//!
//! backend.write_raw("Kitchen", b.bytes()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod image_cache;
mod printer;
mod raster;

// Re-exports
pub use encoding::{CodePage, encode_text, pad_width, single_line, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{Align, Encoder, EscPosBuilder, Font};
pub use image_cache::{ImageCache, ImageCacheError, ImageSource};
pub use printer::{
    NetworkBackend, NetworkPrinter, PrinterBackend, PrinterInfo, cups_status_text, is_unavailable,
    spooler_status_text,
};
pub use raster::{LUMA_THRESHOLD, MAX_DOTS, QR_SIZE, Raster, RasterError, fit_width, qr_image};

#[cfg(not(windows))]
pub use printer::CupsBackend;

#[cfg(windows)]
pub use printer::WindowsSpoolerBackend;
