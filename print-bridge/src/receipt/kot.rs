//! Kitchen order ticket: no prices, large quantities

use escpos_kit::{Align, Encoder};

use super::layout::{PaperWidth, clip};
use super::model::OrderData;

/// Width of the quantity column plus its separator
const QTY_COLUMN: usize = 5;

/// Render a kitchen order ticket
pub fn render_kot<E: Encoder + ?Sized>(p: &mut E, data: &OrderData, width: PaperWidth) {
    let cols = width.columns();
    let opts = &data.display_options;

    p.init();
    p.set_double_strike(true);

    p.set_align(Align::Center);
    p.set_bold(true);
    p.set_size(1, 1);
    p.line("KOT");
    p.set_size(0, 0);
    p.set_bold(false);

    if !data.store_info.brand_name.is_empty() {
        p.set_bold(true);
        p.line(&data.store_info.brand_name);
        p.set_bold(false);
    }
    p.separator('-', cols);

    p.set_align(Align::Left);
    if opts.show_order_number {
        p.line(&format!("Order #: {}", data.invoice_no));
    }
    if opts.show_table_info && !data.table_no.is_empty() {
        p.set_bold(true);
        p.write(&format!("Table: {}", data.table_no));
        p.set_bold(false);
        if !data.order_type.is_empty() {
            p.write(&format!(" ({})", data.order_type));
        }
        p.write("\n");
    } else if !data.order_type.is_empty() {
        p.line(&format!("Type: {}", data.order_type));
    }

    if opts.show_customer_name && !data.customer_name.is_empty() {
        p.line(&format!("Customer: {}", data.customer_name));
    }
    p.line(&format!("Date: {}", data.date));
    p.separator('-', cols);

    p.set_bold(true);
    p.line(&format!("{:<4} {}", "Qty", "Item"));
    p.set_bold(false);
    p.separator('-', cols);

    let name_width = cols - QTY_COLUMN;
    for item in &data.items {
        p.set_bold(true);
        p.line(&format!(
            "{:<4} {}",
            item.quantity,
            clip(&item.name, name_width)
        ));
        p.set_bold(false);

        if !item.variant.is_empty() {
            p.line(&clip(&format!("     Var: {}", item.variant), cols));
        }
        if !item.item_note.is_empty() {
            p.line(&clip(&format!("     Note: {}", item.item_note), cols));
        }
        for child in &item.children {
            p.line(&clip(
                &format!("     + {:<2} {}", child.quantity, child.name),
                cols,
            ));
        }
    }

    p.separator('-', cols);
    p.feed(3);
    p.cut();
}
