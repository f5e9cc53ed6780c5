//! Customer bill / tax invoice

use escpos_kit::{Align, Encoder};
use rust_decimal::Decimal;

use super::layout::{ItemColumns, PaperWidth, clip, money};
use super::model::{OrderData, OrderItem, StoreInfo};

const DEFAULT_CLOSING: &str = "Thank you! Visit Again.";

/// Render a bill. Output goes entirely through `p`.
pub fn render_bill<E: Encoder + ?Sized>(p: &mut E, data: &OrderData, width: PaperWidth) {
    let cols = width.columns();

    p.init();
    p.set_double_strike(true);
    p.set_align(Align::Center);

    header(p, &data.store_info);

    p.line("");
    p.set_bold(true);
    p.line("TAX INVOICE");
    p.set_bold(false);
    p.separator('-', cols);

    p.set_align(Align::Left);
    metadata(p, data);
    p.separator('-', cols);

    items(p, data, width);
    p.separator('-', cols);

    totals(p, data);
    p.separator('-', cols);

    p.set_bold(true);
    p.set_size(0, 1);
    p.line(&format!("GRAND TOTAL: {}", money(data.total)));
    p.set_size(0, 0);
    p.set_bold(false);
    p.separator('-', cols);

    let opts = &data.display_options;
    if opts.show_tax_breakdown && !data.tax_breakdown.is_empty() {
        p.set_align(Align::Left);
        p.line("Tax Details:");
        for t in &data.tax_breakdown {
            p.line(&format!(" {} @ {}% : {}", t.name, money(t.rate), money(t.amount)));
        }
        p.separator('-', cols);
    }

    p.set_align(Align::Center);
    footer(p, data);

    if opts.show_qr_code && !opts.qr_code_data.is_empty() {
        p.line("");
        p.print_qr_code(&opts.qr_code_data);
    }

    p.feed(4);
    p.cut();
}

fn header<E: Encoder + ?Sized>(p: &mut E, store: &StoreInfo) {
    if store.show_logo && !store.logo_url.is_empty() {
        p.print_image(&store.logo_url);
    }

    if !store.brand_name.is_empty() {
        p.set_bold(true);
        p.set_size(1, 1);
        p.line(&store.brand_name);
        p.set_size(0, 0);
        p.set_bold(false);
    }

    if !store.display_name.is_empty() {
        p.line(&store.display_name);
    } else if !store.name.is_empty() {
        p.line(&store.name);
    }

    let labelled = [
        ("", &store.address),
        ("", &store.city),
        ("Phone: ", &store.contact_number),
        ("Email: ", &store.email),
        ("GSTIN: ", &store.gst),
        ("FSSAI (State): ", &store.fssai_state),
        ("FSSAI (Central): ", &store.fssai_central),
        ("CIN: ", &store.cin),
        ("LLPIN: ", &store.llpin),
    ];
    for (label, value) in labelled {
        if !value.is_empty() {
            p.line(&format!("{}{}", label, value));
        }
    }
}

fn metadata<E: Encoder + ?Sized>(p: &mut E, data: &OrderData) {
    p.line(&format!("Invoice No: {}", data.invoice_no));
    p.line(&format!("Date: {}", data.date));

    if !data.order_source.is_empty() {
        p.line(&format!("Source: {}", data.order_source));
    }
    if !data.order_type.is_empty() {
        p.line(&format!("Type: {}", data.order_type));
    }
    if !data.table_no.is_empty() {
        p.line(&format!("Table: {}", data.table_no));
    }

    if data.display_options.show_customer_info {
        if !data.customer_name.is_empty() {
            p.line(&format!("Customer: {}", data.customer_name));
        }
        if !data.customer_contact.is_empty() {
            p.line(&format!("Phone: {}", data.customer_contact));
        }
    }
}

fn items<E: Encoder + ?Sized>(p: &mut E, data: &OrderData, width: PaperWidth) {
    let cols = ItemColumns::for_width(width);
    let line_width = width.columns();

    p.set_bold(true);
    p.line(&cols.row("Item", "Qty", "Rate", "Total"));
    p.set_bold(false);
    p.separator('-', line_width);

    for item in &data.items {
        item_row(p, &cols, &item.name, item);

        if !item.variant.is_empty() {
            p.line(&clip(&format!("  Var: {}", item.variant), line_width));
        }
        if !item.item_note.is_empty() {
            p.line(&clip(&format!("  Note: {}", item.item_note), line_width));
        }

        for child in &item.children {
            let name = format!("  + {}", child.name);
            if child.price.is_zero() {
                p.line(&clip(&name, line_width));
            } else {
                item_row(p, &cols, &name, child);
            }
        }
    }
}

fn item_row<E: Encoder + ?Sized>(p: &mut E, cols: &ItemColumns, name: &str, item: &OrderItem) {
    p.line(&cols.row(
        name,
        &item.quantity.to_string(),
        &money(item.price),
        &money(item.line_total()),
    ));
}

fn totals<E: Encoder + ?Sized>(p: &mut E, data: &OrderData) {
    p.set_align(Align::Right);
    p.line(&format!("Subtotal: {}", money(data.sub_total)));

    if data.display_options.show_discount_breakdown {
        for d in &data.discount_breakdown {
            p.line(&format!("{}: -{}", d.name, money(d.amount)));
        }
    }

    for c in &data.charges {
        p.line(&format!("{}: {}", c.name, money(c.amount)));
    }

    if data.tax > Decimal::ZERO {
        p.line(&format!("Total Tax: {}", money(data.tax)));
    }
}

fn footer<E: Encoder + ?Sized>(p: &mut E, data: &OrderData) {
    if data.display_options.show_payment_details {
        if !data.payments.is_empty() {
            p.line("Payment Mode:");
            for pay in &data.payments {
                p.line(&format!("{}: {}", pay.mode, money(pay.amount)));
            }
        } else if !data.payment_mode.is_empty() {
            p.line(&format!("Payment Mode: {}", data.payment_mode));
        }
    }

    if !data.cashier_name.is_empty() {
        p.line(&format!("Cashier: {}", data.cashier_name));
    }

    p.line("");
    let store = &data.store_info;
    let closing = [&store.policy, &store.footer_text]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or(DEFAULT_CLOSING);
    p.line(closing);

    if !store.website.is_empty() {
        p.line(&format!("Visit: {}", store.website));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::sample::sample_order;
    use crate::receipt::testing::{Op, Recorder};
    use escpos_kit::EscPosBuilder;

    fn tea_order() -> OrderData {
        serde_json::from_str(
            r#"{"items":[{"name":"Tea","quantity":2,"price":20.0}],"subTotal":40.0,"tax":0,"total":40.0}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_item_bill() {
        let mut rec = Recorder::default();
        render_bill(&mut rec, &tea_order(), PaperWidth::Mm58);

        let item_lines: Vec<_> = rec.lines().into_iter().filter(|l| l.starts_with("Tea")).collect();
        assert_eq!(item_lines, vec!["Tea          2    20.00    40.00"]);
        assert!(rec.lines().contains(&"GRAND TOTAL: 40.00".to_string()));
        assert!(!rec.lines().iter().any(|l| l.starts_with("Total Tax")));
        assert!(rec.lines().contains(&DEFAULT_CLOSING.to_string()));
        assert_eq!(rec.ops.last(), Some(&Op::Cut));
    }

    #[test]
    fn test_bill_bytes_end_with_cut() {
        let mut b = EscPosBuilder::new();
        render_bill(&mut b, &tea_order(), PaperWidth::Mm58);
        let bytes = b.into_bytes();
        assert_eq!(&bytes[..2], &[0x1B, 0x40]);
        assert!(bytes.ends_with(&[0x1B, 0x64, 0x04, 0x1D, 0x56, 0x42, 0x00]));
    }

    #[test]
    fn test_lines_fit_budget() {
        for width in [PaperWidth::Mm58, PaperWidth::Mm80] {
            let mut rec = Recorder::default();
            let mut order = sample_order();
            order.items[0].name = "An extraordinarily long dish name that never fits".into();
            render_bill(&mut rec, &order, width);
            let cols = ItemColumns::for_width(width);
            let row = rec
                .lines()
                .into_iter()
                .find(|l| l.starts_with("An extra"))
                .unwrap();
            assert_eq!(row.len(), width.columns());
            assert_eq!(row[..cols.name].trim_end().len(), cols.name);
        }
    }

    #[test]
    fn test_children_rows() {
        let mut rec = Recorder::default();
        render_bill(&mut rec, &sample_order(), PaperWidth::Mm80);
        let lines = rec.lines();
        // Free add-on: name only
        assert!(lines.contains(&"  + Roti".to_string()));
        // Priced add-on: full row with the prefix folded into the name field
        let papad = lines.iter().find(|l| l.starts_with("  + Extra Papad")).unwrap();
        assert!(papad.ends_with("10.00      10.00"));
        assert_eq!(papad.len(), 48);
        assert!(lines.contains(&"  Var: Deluxe".to_string()));
        assert!(lines.contains(&"  Note: Spicy".to_string()));
    }

    #[test]
    fn test_emoji_and_multiline_names_still_print() {
        let order: OrderData = serde_json::from_value(serde_json::json!({
            "items": [
                {"name": "Chocolate\u{2764}\u{FE0F}", "quantity": 1, "price": 10},
                {"name": "Tea\nCake", "quantity": 1, "price": 5, "children": [
                    {"name": "Whipped cream with sprinkles and syrup", "quantity": 1, "price": 0}
                ]}
            ],
            "total": 15
        }))
        .unwrap();

        let mut rec = Recorder::default();
        render_bill(&mut rec, &order, PaperWidth::Mm58);
        let lines = rec.lines();

        let heart = lines.iter().find(|l| l.starts_with("Chocolate")).unwrap();
        assert_eq!(escpos_kit::text_width(heart), 32);
        let cake = lines.iter().find(|l| l.starts_with("Tea Cake")).unwrap();
        assert_eq!(cake, "Tea Cake     1     5.00     5.00");
        assert!(!lines.iter().any(|l| l == "Cake"));
        assert!(lines.contains(&"  + Whipped cream with sprinkles".to_string()));
        assert!(lines.iter().all(|l| escpos_kit::text_width(l) <= 32));
        assert_eq!(rec.ops.last(), Some(&Op::Cut));
    }

    #[test]
    fn test_sections_gated_by_flags() {
        let mut order = sample_order();
        order.display_options.show_tax_breakdown = false;
        order.display_options.show_payment_details = false;
        order.display_options.show_customer_info = false;
        order.display_options.show_qr_code = false;
        order.store_info.show_logo = false;

        let mut rec = Recorder::default();
        render_bill(&mut rec, &order, PaperWidth::Mm58);
        let lines = rec.lines();
        assert!(!lines.iter().any(|l| l == "Tax Details:"));
        assert!(!lines.iter().any(|l| l.starts_with("Payment Mode")));
        assert!(!lines.iter().any(|l| l.starts_with("Customer:")));
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Qr(_) | Op::Image(_))));

        // No doubled separators where sections were skipped
        let seps: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.chars().all(|c| c == '-') && !l.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert!(seps.windows(2).all(|w| w[1] - w[0] > 1));
    }

    #[test]
    fn test_full_sample_sections() {
        let mut rec = Recorder::default();
        render_bill(&mut rec, &sample_order(), PaperWidth::Mm80);
        let lines = rec.lines();

        for expected in [
            "The Food Place",
            "The Food Place - Mumbai",
            "Phone: 022-12345678",
            "GSTIN: 27ABCDE1234F1Z5",
            "FSSAI (State): 12345678901234",
            "LLPIN: A12345MH2023PLC123456",
            "TAX INVOICE",
            "Invoice No: INV-2026-001",
            "Customer: Saurabh Sharma",
            "Subtotal: 740.00",
            "Service Charge: 20.00",
            "Total Tax: 37.00",
            "GRAND TOTAL: 797.00",
            " CGST @ 9.00% : 18.50",
            "Payment Mode:",
            "UPI: 797.00",
            "Cashier: Rahul",
            "No refund, No exchange",
            "Visit: https://thefoodplace.com",
        ] {
            assert!(lines.contains(&expected.to_string()), "missing {:?}", expected);
        }

        let image_at = rec.ops.iter().position(|op| matches!(op, Op::Image(_))).unwrap();
        let qr_at = rec.ops.iter().position(|op| matches!(op, Op::Qr(_))).unwrap();
        assert!(image_at < qr_at);
        assert_eq!(
            rec.ops[qr_at],
            Op::Qr("https://thefoodplace.com/feedback/INV-2026-001".into())
        );
    }

    #[test]
    fn test_payment_mode_fallback_and_discounts() {
        let mut order = tea_order();
        order.display_options.show_payment_details = true;
        order.display_options.show_discount_breakdown = true;
        order.payment_mode = "Cash".into();
        order.discount_breakdown.push(crate::receipt::model::DiscountLine {
            name: "Happy Hour".into(),
            amount: Decimal::new(5, 0),
        });
        order.store_info.footer_text = "See you soon".into();

        let mut rec = Recorder::default();
        render_bill(&mut rec, &order, PaperWidth::Mm58);
        let lines = rec.lines();
        assert!(lines.contains(&"Payment Mode: Cash".to_string()));
        assert!(lines.contains(&"Happy Hour: -5.00".to_string()));
        assert!(lines.contains(&"See you soon".to_string()));
    }
}
