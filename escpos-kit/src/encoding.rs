//! Text width and code page utilities
//!
//! Receipt layout works in printer columns, not bytes or chars:
//! - ASCII and most Latin text is one column per char
//! - CJK and other wide glyphs take two columns
//!
//! The printer side encoding is selected by [`CodePage`]. UTF-8 is passed
//! through untouched; GBK is for Chinese firmware that expects double-byte
//! text after `FS &`.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Text encoding sent to the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    #[default]
    Utf8,
    Gbk,
}

impl CodePage {
    /// Parse a config value (`utf8`, `gbk`). Unknown values fall back to UTF-8.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gbk" | "gb2312" | "cp936" => CodePage::Gbk,
            _ => CodePage::Utf8,
        }
    }
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Printed column width of a string
///
/// Summed per char, the same way [`truncate_width`] measures, so a cut
/// string never measures wider than the limit it was cut to.
pub fn text_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Truncate a string to fit within `max_width` columns
pub fn truncate_width(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if width + w > max_width {
            return &s[..idx];
        }
        width += w;
    }
    s
}

/// Replace control characters (`\n`, `\r`, `\t`, ...) with spaces
pub fn single_line(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_control) {
        Cow::Owned(
            s.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

/// Pad a string to exactly `width` columns, on one line
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align_right: bool) -> String {
    let line = single_line(s);
    let s = truncate_width(&line, width);
    let spaces = width.saturating_sub(text_width(s));
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Encode text for the printer
pub fn encode_text(code_page: CodePage, s: &str) -> Cow<'_, [u8]> {
    match code_page {
        CodePage::Utf8 => Cow::Borrowed(s.as_bytes()),
        CodePage::Gbk => {
            if s.is_ascii() {
                return Cow::Borrowed(s.as_bytes());
            }
            Cow::Owned(encode_gbk(s))
        }
    }
}

/// GBK has no euro sign: drop out of Chinese mode, print it from PC858, re-enter.
fn encode_gbk(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    let parts: Vec<&str> = s.split('€').collect();
    for (idx, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            let (gbk, _, _) = encoding_rs::GBK.encode(part);
            out.extend_from_slice(&gbk);
        }
        if idx < parts.len() - 1 {
            out.extend_from_slice(&[0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26]);
        }
    }
    out
}
