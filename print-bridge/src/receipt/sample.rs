//! Demo order used by the test-print endpoint

use rust_decimal::Decimal;

use super::model::{
    ChargeLine, DisplayOptions, OrderData, OrderItem, PaymentLine, StoreInfo, TaxLine,
};

fn amount(units: i64) -> Decimal {
    Decimal::from(units)
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn item(name: &str, quantity: u32, price: i64) -> OrderItem {
    OrderItem {
        name: name.to_string(),
        quantity,
        price: amount(price),
        ..Default::default()
    }
}

/// A fully populated dine-in order exercising every bill and KOT section
pub fn sample_order() -> OrderData {
    OrderData {
        invoice_no: "INV-2026-001".into(),
        date: "28/01/2026, 01:30 PM".into(),
        customer_name: "Saurabh Sharma".into(),
        customer_contact: "9876543210".into(),
        table_no: "T-12".into(),
        order_type: "Dine-In".into(),
        order_source: "POS".into(),
        cashier_name: "Rahul".into(),
        items: vec![
            OrderItem {
                sku: "SKU_101".into(),
                item_note: "Spicy".into(),
                variant: "Full".into(),
                tax_amount: amount(14),
                children: vec![item("Extra Gravy", 1, 20)],
                ..item("Paneer Tikka Masala", 1, 280)
            },
            item("Butter Naan", 2, 40),
            OrderItem {
                variant: "Deluxe".into(),
                children: vec![
                    item("Roti", 2, 0),
                    item("Rice", 1, 0),
                    item("Sweet", 1, 0),
                    item("Extra Papad", 1, 10),
                ],
                ..item("Veg Thali", 1, 350)
            },
        ],
        sub_total: amount(740),
        tax: amount(37),
        total: amount(797),
        payment_mode: "UPI".into(),
        store_info: StoreInfo {
            name: "Mumbai Branch".into(),
            display_name: "The Food Place - Mumbai".into(),
            brand_name: "The Food Place".into(),
            store_group_name: "West Region".into(),
            header_text: "Welcome to The Food Place".into(),
            footer_text: "Visit again!".into(),
            show_logo: true,
            logo_url: "https://via.placeholder.com/150".into(),
            gst: "27ABCDE1234F1Z5".into(),
            address: "Shop 12, Main Street, Andheri West".into(),
            city: "Mumbai, Maharashtra 400053".into(),
            contact_number: "022-12345678".into(),
            email: "contact@thefoodplace.com".into(),
            policy: "No refund, No exchange".into(),
            fssai_state: "12345678901234".into(),
            fssai_central: "98765432109876".into(),
            cin: "U12345MH2023PTC123456".into(),
            llpin: "A12345MH2023PLC123456".into(),
            website: "https://thefoodplace.com".into(),
        },
        display_options: DisplayOptions {
            show_tax_breakdown: true,
            show_discount_breakdown: true,
            show_payment_details: true,
            show_customer_info: true,
            show_barcode: true,
            show_qr_code: true,
            qr_code_data: "https://thefoodplace.com/feedback/INV-2026-001".into(),
            show_table_info: true,
            show_customer_name: true,
            show_order_number: true,
            show_preparation_time: true,
            group_by_category: true,
        },
        tax_breakdown: vec![
            TaxLine {
                name: "CGST".into(),
                rate: amount(9),
                amount: cents(1850),
            },
            TaxLine {
                name: "SGST".into(),
                rate: amount(9),
                amount: cents(1850),
            },
        ],
        discount_breakdown: Vec::new(),
        charges: vec![ChargeLine {
            name: "Service Charge".into(),
            amount: amount(20),
        }],
        payments: vec![PaymentLine {
            mode: "UPI".into(),
            amount: amount(797),
        }],
    }
}
