//! Order / KOT data model
//!
//! Field presence differs between POS clients, so every field is optional on
//! the wire and falls back to its default. JSON names are camelCase.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One order line, possibly with add-ons
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price
    pub price: Decimal,
    pub sku: String,
    pub item_note: String,
    pub variant: String,
    #[serde(deserialize_with = "lenient_children")]
    pub children: Vec<OrderItem>,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
}

impl OrderItem {
    /// Quantity × unit price. Caller-supplied line totals are never used.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaxLine {
    pub name: String,
    /// Percentage, e.g. `9` for 9%
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChargeLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscountLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaymentLine {
    pub mode: String,
    pub amount: Decimal,
}

/// Branding, contact and compliance block printed in the bill header
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreInfo {
    pub name: String,
    pub display_name: String,
    pub brand_name: String,
    pub store_group_name: String,
    pub header_text: String,
    pub footer_text: String,
    pub show_logo: bool,
    #[serde(rename = "logoURL")]
    pub logo_url: String,
    /// GSTIN
    pub gst: String,
    pub address: String,
    pub city: String,
    pub contact_number: String,
    pub email: String,
    pub policy: String,
    pub fssai_state: String,
    pub fssai_central: String,
    pub cin: String,
    pub llpin: String,
    pub website: String,
}

/// Section toggles. Bill and KOT flags share one block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    pub show_tax_breakdown: bool,
    pub show_discount_breakdown: bool,
    pub show_payment_details: bool,
    pub show_customer_info: bool,
    pub show_barcode: bool,
    #[serde(rename = "showQRCode")]
    pub show_qr_code: bool,
    pub qr_code_data: String,

    // KOT
    pub show_table_info: bool,
    pub show_customer_name: bool,
    pub show_order_number: bool,
    pub show_preparation_time: bool,
    pub group_by_category: bool,
}

/// Receipt payload as sent by the POS
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderData {
    /// Display form of the invoice number; clients send strings or numbers
    #[serde(deserialize_with = "invoice_no")]
    pub invoice_no: String,
    pub date: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub table_no: String,
    pub order_type: String,
    pub order_source: String,
    pub cashier_name: String,
    pub items: Vec<OrderItem>,
    pub sub_total: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_mode: String,
    pub store_info: StoreInfo,
    pub display_options: DisplayOptions,

    pub tax_breakdown: Vec<TaxLine>,
    pub discount_breakdown: Vec<DiscountLine>,
    pub charges: Vec<ChargeLine>,
    pub payments: Vec<PaymentLine>,
}

/// `"INV-1"` → `INV-1`, `1001` → `1001`, `12.5` → `12.5`, `null` → empty
fn invoice_no<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(D::Error::custom(format!("invalid invoiceNo: {}", other))),
    })
}

/// Some clients send `""` or `null` instead of an empty array
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        v @ Value::Array(_) => serde_json::from_value(v).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "children must be an array, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_order() {
        let order: OrderData = serde_json::from_str(
            r#"{"items":[{"name":"Tea","quantity":2,"price":20.0}],"subTotal":40.0,"tax":0,"total":40.0}"#,
        )
        .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total(), Decimal::from(40));
        assert_eq!(order.total, Decimal::from(40));
        assert!(order.invoice_no.is_empty());
        assert!(!order.display_options.show_qr_code);
    }

    #[test]
    fn test_invoice_no_forms() {
        let s: OrderData = serde_json::from_str(r#"{"invoiceNo":"INV-7"}"#).unwrap();
        assert_eq!(s.invoice_no, "INV-7");
        let n: OrderData = serde_json::from_str(r#"{"invoiceNo":1001}"#).unwrap();
        assert_eq!(n.invoice_no, "1001");
        let f: OrderData = serde_json::from_str(r#"{"invoiceNo":12.5}"#).unwrap();
        assert_eq!(f.invoice_no, "12.5");
        let null: OrderData = serde_json::from_str(r#"{"invoiceNo":null}"#).unwrap();
        assert_eq!(null.invoice_no, "");
        assert!(serde_json::from_str::<OrderData>(r#"{"invoiceNo":[1]}"#).is_err());
    }

    #[test]
    fn test_children_forms() {
        let item: OrderItem = serde_json::from_str(r#"{"name":"Thali","children":""}"#).unwrap();
        assert!(item.children.is_empty());
        let item: OrderItem = serde_json::from_str(r#"{"name":"Thali","children":null}"#).unwrap();
        assert!(item.children.is_empty());
        let item: OrderItem = serde_json::from_str(
            r#"{"name":"Thali","children":[{"name":"Roti","quantity":2,"children":[{"name":"Ghee"}]}]}"#,
        )
        .unwrap();
        assert_eq!(item.children[0].name, "Roti");
        assert_eq!(item.children[0].children[0].name, "Ghee");
        assert!(serde_json::from_str::<OrderItem>(r#"{"children":"x"}"#).is_err());
    }

    #[test]
    fn test_money_accepts_strings() {
        let item: OrderItem =
            serde_json::from_str(r#"{"name":"Naan","quantity":3,"price":"12.50"}"#).unwrap();
        assert_eq!(item.line_total(), Decimal::new(375, 1));
    }

    #[test]
    fn test_renamed_fields() {
        let order: OrderData = serde_json::from_str(
            r#"{"storeInfo":{"logoURL":"https://x/logo.png","showLogo":true,"fssaiState":"123"},
                "displayOptions":{"showQRCode":true,"qrCodeData":"q"}}"#,
        )
        .unwrap();
        assert_eq!(order.store_info.logo_url, "https://x/logo.png");
        assert_eq!(order.store_info.fssai_state, "123");
        assert!(order.display_options.show_qr_code);
        assert_eq!(order.display_options.qr_code_data, "q");
    }
}
