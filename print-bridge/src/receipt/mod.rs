//! Receipt layouts
//!
//! Pure functions from an [`OrderData`] to [`Encoder`] calls. Two layouts:
//! - [`render_bill`] - customer-facing tax invoice
//! - [`render_kot`] - kitchen order ticket, no prices
//!
//! Column budget: 32 chars on 58mm paper, 48 on 80mm.

mod bill;
mod kot;
mod layout;
mod model;
mod sample;

#[cfg(test)]
pub(crate) mod testing;

pub use bill::render_bill;
pub use kot::render_kot;
pub use layout::{ItemColumns, PaperWidth, ReceiptType, clip, money};
pub use model::{
    ChargeLine, DiscountLine, DisplayOptions, OrderData, OrderItem, PaymentLine, StoreInfo,
    TaxLine,
};
pub use sample::sample_order;

use escpos_kit::Encoder;

/// Render the layout selected by `kind`
pub fn render<E: Encoder + ?Sized>(
    p: &mut E,
    kind: ReceiptType,
    data: &OrderData,
    width: PaperWidth,
) {
    match kind {
        ReceiptType::Bill => render_bill(p, data, width),
        ReceiptType::Kot => render_kot(p, data, width),
    }
}
