//! Content-stream interpretation into positioned text fragments.
//!
//! Glyph widths are not read from the font program; a fragment's width is
//! estimated at half an em per character, which is enough for the line
//! grouping and gap tests downstream.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{BoundingBox, TextFragment};

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};

/// Ascender height as a fraction of the font size.
const ASCENT: f32 = 0.8;
/// Descender depth as a fraction of the font size.
const DESCENT: f32 = 0.2;
/// Estimated advance per character, in thousandths of an em.
const GLYPH_ADVANCE: f32 = 500.0;
/// TJ adjustments beyond this (thousandths of an em) are word spaces.
const SPACE_THRESHOLD: f32 = 200.0;

/// 2D affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(ops: &[PdfValue]) -> Option<Self> {
        if ops.len() < 6 {
            return None;
        }
        let n = |i: usize| get_number_from_value(&ops[i]);
        Some(Self {
            a: n(0)?,
            b: n(1)?,
            c: n(2)?,
            d: n(3)?,
            e: n(4)?,
            f: n(5)?,
        })
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translated(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state carried across operators.
#[derive(Debug, Clone, Default)]
struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_resource: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            font_size: 12.0,
            ..Default::default()
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.translated(tx, ty);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }
}

/// Interprets the content stream of one page.
pub struct FragmentExtractor<'a, B: PdfBackend> {
    backend: &'a B,
    page: PageId,
    page_number: u32,
    fonts: HashMap<Vec<u8>, String>,
}

impl<'a, B: PdfBackend> FragmentExtractor<'a, B> {
    /// Prepare extraction for one page; loads the page's font table.
    pub fn new(backend: &'a B, page: PageId, page_number: u32) -> Result<Self> {
        let fonts = backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();
        Ok(Self {
            backend,
            page,
            page_number,
            fonts,
        })
    }

    /// Decode the page's content and collect its fragments in stream order.
    pub fn extract(&self) -> Result<Vec<TextFragment>> {
        let data = self.backend.page_content(self.page)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&data)?;
        Ok(self.interpret(&ops))
    }

    /// Run the operators through the text state machine.
    pub fn interpret(&self, ops: &[ContentOp]) -> Vec<TextFragment> {
        let mut state = TextState::new();
        let mut fragments = Vec::new();

        for op in ops {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.ctm_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = state.ctm_stack.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.ctm = m.then(&state.ctm);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.text_matrix = Matrix::IDENTITY;
                    state.line_matrix = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = operands.first() {
                        state.font_resource = name.clone();
                    }
                    if let Some(size) = operands.get(1).and_then(get_number_from_value) {
                        state.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number_from_value) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(get_number_from_value).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(get_number_from_value).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.text_matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        let text = self.decode(&state, bytes);
                        self.show(&mut state, text, 0.0, &mut fragments);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = operands.first() {
                        let (text, adjust) = self.decode_array(&state, items);
                        self.show(&mut state, text, adjust, &mut fragments);
                    }
                }
                "'" => {
                    state.next_line();
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        let text = self.decode(&state, bytes);
                        self.show(&mut state, text, 0.0, &mut fragments);
                    }
                }
                "\"" => {
                    state.next_line();
                    if let Some(PdfValue::Str(bytes)) = operands.get(2) {
                        let text = self.decode(&state, bytes);
                        self.show(&mut state, text, 0.0, &mut fragments);
                    }
                }
                _ => {}
            }
        }

        fragments
    }

    fn decode(&self, state: &TextState, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, &state.font_resource, bytes)
    }

    /// Decode a TJ array; returns the text and the summed positioning
    /// adjustment in thousandths of an em.
    fn decode_array(&self, state: &TextState, items: &[PdfValue]) -> (String, f32) {
        let mut combined = String::new();
        let mut adjust = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(state, bytes)),
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let n = get_number_from_value(item).unwrap_or(0.0);
                    adjust += n;
                    if -n > SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        (combined, adjust)
    }

    /// Emit a fragment for `text` at the current position and advance.
    fn show(&self, state: &mut TextState, text: String, adjust: f32, out: &mut Vec<TextFragment>) {
        let chars = text.chars().count() as f32;
        let advance = (chars * GLYPH_ADVANCE - adjust) / 1000.0 * state.font_size;

        if state.in_text && !text.trim().is_empty() {
            let render = state.text_matrix.then(&state.ctm);
            let size = state.font_size.abs() * render.vertical_scale();
            let width = chars * GLYPH_ADVANCE / 1000.0 * state.font_size.abs() * render.horizontal_scale();
            let (x, y) = (render.e, render.f);

            let font_name = self
                .fonts
                .get(&state.font_resource)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| String::from_utf8_lossy(&state.font_resource).to_string());

            let bbox = BoundingBox::new(x, y - DESCENT * size, x + width, y + ASCENT * size);
            out.push(TextFragment::new(text, size, self.page_number, bbox).with_font(font_name));
        }

        state.text_matrix = state.text_matrix.translated(advance, 0.0);
    }
}
