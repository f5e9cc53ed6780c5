//! Recording encoder for layout tests

use escpos_kit::{Align, Encoder, Font};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Init,
    Align(Align),
    Font(Font),
    Bold(bool),
    DoubleStrike(bool),
    Size(u8, u8),
    Write(String),
    Feed(u8),
    Cut,
    Qr(String),
    Image(String),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
}

impl Recorder {
    /// All written text, concatenated
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Write(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

impl Encoder for Recorder {
    fn init(&mut self) {
        self.ops.push(Op::Init);
    }
    fn set_align(&mut self, align: Align) {
        self.ops.push(Op::Align(align));
    }
    fn set_font(&mut self, font: Font) {
        self.ops.push(Op::Font(font));
    }
    fn set_bold(&mut self, on: bool) {
        self.ops.push(Op::Bold(on));
    }
    fn set_double_strike(&mut self, on: bool) {
        self.ops.push(Op::DoubleStrike(on));
    }
    fn set_size(&mut self, width: u8, height: u8) {
        self.ops.push(Op::Size(width, height));
    }
    fn write(&mut self, text: &str) {
        self.ops.push(Op::Write(text.to_string()));
    }
    fn feed(&mut self, lines: u8) {
        self.ops.push(Op::Feed(lines));
    }
    fn cut(&mut self) {
        self.ops.push(Op::Cut);
    }
    fn print_qr_code(&mut self, data: &str) {
        self.ops.push(Op::Qr(data.to_string()));
    }
    fn print_image(&mut self, url: &str) {
        self.ops.push(Op::Image(url.to_string()));
    }
}
