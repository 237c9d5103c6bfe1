//! Positioned text spans from a page's content stream.
//!
//! Table detection works on where text is drawn, not on the flowed text
//! returned by plain extraction, so this walks the text operators of the
//! content stream and records each shown string with its origin and size.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Threshold (thousandths of text space) above which a TJ adjustment reads as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size, used for width estimates.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A text span with position and style information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span, estimating its width from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }
}

/// Walks page content streams of a loaded document.
pub struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract text spans from a page with position and font information.
    ///
    /// `page_number` is only used to label errors.
    pub fn extract_page_spans(&self, page_number: u32, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fail = |reason: String| Error::Extraction {
            page: page_number,
            reason,
        };

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| fail(e.to_string()))?;

        // Follows indirect /Contents arrays and keeps unfiltered streams as stored.
        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| fail(e.to_string()))?;
        self.parse_content_stream(&content, &fonts).map_err(fail)
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> std::result::Result<Vec<TextSpan>, String> {
        let content = lopdf::content::Content::decode(content).map_err(|e| e.to_string())?;

        let mut spans = Vec::new();
        let mut state = TextState::default();

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text_block = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => state.in_text_block = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            state.font_key = name.clone();
                            state.font_name = fonts
                                .get(name.as_slice())
                                .and_then(|dict| dict.get(b"BaseFont").ok())
                                .and_then(|o| o.as_name().ok())
                                .map(|n| String::from_utf8_lossy(n).to_string())
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        state.font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        state.matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.matrix.leading = -ty;
                        }
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        state.matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => state.matrix.next_line(),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        let text = self.decode(fonts, &state.font_key, bytes);
                        state.push_span(&mut spans, text);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(arr)) = op.operands.first() {
                        let text = self.decode_tj_array(fonts, &state.font_key, arr);
                        state.push_span(&mut spans, text);
                    }
                }
                "'" | "\"" => {
                    state.matrix.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode(fonts, &state.font_key, bytes);
                        state.push_span(&mut spans, text);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn decode(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_key: &[u8],
        bytes: &[u8],
    ) -> String {
        let encoding = fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    /// TJ: array of strings and positioning adjustments.
    ///
    /// Large negative adjustments advance the pen by roughly a space and are
    /// turned into one, except after characters of scripts without word spaces.
    fn decode_tj_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_key: &[u8],
        arr: &[Object],
    ) -> String {
        let encoding = fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        let mut combined = String::new();

        for item in arr {
            let adjustment = match item {
                Object::String(bytes, _) => {
                    let decoded = match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    };
                    combined.push_str(&decoded);
                    continue;
                }
                Object::Integer(n) => -(*n as f32),
                Object::Real(n) => -n,
                _ => continue,
            };

            if adjustment > TJ_SPACE_THRESHOLD
                && !combined.ends_with(' ')
                && !combined.ends_with('\u{00A0}')
                && combined
                    .chars()
                    .last()
                    .is_some_and(|c| !is_spaceless_script_char(c))
            {
                combined.push(' ');
            }
        }

        combined
    }
}

struct TextState {
    matrix: TextMatrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    in_text_block: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            in_text_block: false,
        }
    }
}

impl TextState {
    fn push_span(&self, spans: &mut Vec<TextSpan>, text: String) {
        if !self.in_text_block || text.trim().is_empty() {
            return;
        }
        let (x, y) = self.matrix.position();
        spans.push(TextSpan::new(
            text,
            x,
            y,
            self.font_size * self.matrix.scale(),
            self.font_name.clone(),
        ));
    }
}

struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    /// Td moves relative to the start of the current line.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
