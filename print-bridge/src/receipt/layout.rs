//! Column arithmetic shared by the bill and KOT layouts

use std::fmt;

use escpos_kit::{pad_width, single_line, truncate_width};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Paper width class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperWidth {
    #[default]
    Mm58,
    Mm80,
}

impl PaperWidth {
    /// Only `"80mm"` selects the wide layout
    pub fn parse(value: &str) -> Self {
        if value == "80mm" {
            PaperWidth::Mm80
        } else {
            PaperWidth::Mm58
        }
    }

    /// Characters per line in font A
    pub fn columns(self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaperWidth::Mm58 => "58mm",
            PaperWidth::Mm80 => "80mm",
        }
    }
}

impl<'de> Deserialize<'de> for PaperWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// Which layout to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptType {
    #[default]
    Bill,
    Kot,
}

impl ReceiptType {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("kot") {
            ReceiptType::Kot
        } else {
            ReceiptType::Bill
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReceiptType::Bill => "bill",
            ReceiptType::Kot => "kot",
        }
    }
}

impl fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReceiptType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReceiptType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// Bill item table: name | qty | rate | amount, single-space separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemColumns {
    pub name: usize,
    pub qty: usize,
    pub rate: usize,
    pub amount: usize,
}

impl ItemColumns {
    const SEPARATORS: usize = 3;

    pub fn for_width(width: PaperWidth) -> Self {
        match width {
            PaperWidth::Mm58 => Self {
                name: 10,
                qty: 3,
                rate: 8,
                amount: 8,
            },
            PaperWidth::Mm80 => Self {
                name: 22,
                qty: 4,
                rate: 9,
                amount: 10,
            },
        }
    }

    /// Total line width including separators
    pub fn total(&self) -> usize {
        self.name + self.qty + self.rate + self.amount + Self::SEPARATORS
    }

    /// One table row. Numbers are right-justified; a number wider than its
    /// field takes the extra columns from the name field, so the row stays
    /// within the paper width.
    pub fn row(&self, name: &str, qty: &str, rate: &str, amount: &str) -> String {
        let overflow = qty.len().saturating_sub(self.qty)
            + rate.len().saturating_sub(self.rate)
            + amount.len().saturating_sub(self.amount);
        format!(
            "{} {:>qw$} {:>rw$} {:>aw$}",
            pad_width(name, self.name.saturating_sub(overflow), false),
            qty,
            rate,
            amount,
            qw = self.qty,
            rw = self.rate,
            aw = self.amount,
        )
    }
}

/// A free-text line cut to the paper width
pub fn clip(text: &str, cols: usize) -> String {
    truncate_width(&single_line(text), cols).to_string()
}

/// Two decimals, half away from zero
pub fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
