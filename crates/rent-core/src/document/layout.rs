// ============================================================================
// Rent Core - Document Layout
// File: crates/rent-core/src/document/layout.rs
// Description: Page composition (wrapping, pagination, tables) and PDF output
// ============================================================================

use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::error::DomainError;

// US Letter, in points
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const MM: f32 = 72.0 / 25.4;
const SIDE_MARGIN: f32 = 10.0 * MM;
const TOP_MARGIN: f32 = 15.0 * MM;
const BOTTOM_LIMIT: f32 = 20.0 * MM;
const FOOTER_Y: f32 = 10.0 * MM;

const TITLE_SIZE: f32 = 14.0;
const HEADING_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 8.0;
const LEADING: f32 = 1.35;
const CELL_PADDING: f32 = 3.0;
const HEADER_GRAY: f32 = 0.80;
const ROW_GRAY: f32 = 0.93;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// A piece of paragraph text. A `keep` run is never split across lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: Font,
    pub keep: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: Font::Regular, keep: false }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: Font::Bold, keep: false }
    }

    pub fn keep(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: Font::Regular, keep: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Centered(String),
    Heading(String),
    Paragraph(Vec<Run>),
    /// Column widths are fractions of the text width
    Table {
        headers: Vec<String>,
        widths: Vec<f32>,
        rows: Vec<Vec<String>>,
    },
    /// `(role, name)` pairs laid out side by side
    Signatures(Vec<(String, String)>),
    Space(f32),
}

type Segment = (Font, String);

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Text { x: f32, y: f32, size: f32, segments: Vec<Segment> },
    Fill { x: f32, y: f32, width: f32, height: f32, gray: f32 },
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<Op>,
}

/// Rough Helvetica advance widths, in ems
fn char_width(c: char, font: Font) -> f32 {
    let base = match c {
        ' ' | 'i' | 'j' | 'l' | 'í' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '-' | '/' | '"' => 0.34,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.84,
        '0'..='9' | '$' => 0.556,
        c if c.is_uppercase() => 0.68,
        _ => 0.53,
    };
    match font {
        Font::Regular => base,
        Font::Bold => base * 1.06,
    }
}

pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, font)).sum::<f32>() * size
}

struct Token {
    font: Font,
    text: String,
    space_before: bool,
}

/// Break runs into lines no wider than `max_width`. Tokens with no whitespace
/// between them (a date and its trailing comma) move as one unit.
pub fn wrap(runs: &[Run], size: f32, max_width: f32) -> Vec<Vec<Segment>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut space = false;
    for run in runs {
        if run.keep {
            tokens.push(Token { font: run.font, text: run.text.clone(), space_before: space });
            space = false;
            continue;
        }
        let mut word = String::new();
        for c in run.text.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token {
                        font: run.font,
                        text: std::mem::take(&mut word),
                        space_before: space,
                    });
                }
                space = true;
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            tokens.push(Token { font: run.font, text: word, space_before: space });
            space = false;
        }
    }

    let mut units: Vec<Vec<Token>> = Vec::new();
    for token in tokens {
        match units.last_mut() {
            Some(unit) if !token.space_before => unit.push(token),
            _ => units.push(vec![token]),
        }
    }

    let space_width = text_width(" ", Font::Regular, size);
    let mut lines: Vec<Vec<Vec<Token>>> = Vec::new();
    let mut current: Vec<Vec<Token>> = Vec::new();
    let mut width = 0.0;
    for unit in units {
        let unit_width: f32 = unit.iter().map(|t| text_width(&t.text, t.font, size)).sum();
        if current.is_empty() {
            width = unit_width;
        } else if width + space_width + unit_width > max_width {
            lines.push(std::mem::take(&mut current));
            width = unit_width;
        } else {
            width += space_width + unit_width;
        }
        current.push(unit);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .map(|line| {
            let mut segments: Vec<Segment> = Vec::new();
            for (i, unit) in line.into_iter().enumerate() {
                for (j, token) in unit.into_iter().enumerate() {
                    let text = if i > 0 && j == 0 {
                        format!(" {}", token.text)
                    } else {
                        token.text
                    };
                    match segments.last_mut() {
                        Some((font, existing)) if *font == token.font => existing.push_str(&text),
                        _ => segments.push((token.font, text)),
                    }
                }
            }
            segments
        })
        .collect()
}

/// Lays blocks out top to bottom, opening pages as needed
pub struct PageComposer {
    pages: Vec<Page>,
    cursor: f32,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageComposer {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: PAGE_HEIGHT - TOP_MARGIN,
        }
    }

    fn text_width_available() -> f32 {
        PAGE_WIDTH - 2.0 * SIDE_MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = PAGE_HEIGHT - TOP_MARGIN;
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= BOTTOM_LIMIT
    }

    fn ensure_room(&mut self, height: f32) {
        if !self.fits(height) {
            self.new_page();
        }
    }

    fn emit(&mut self, op: Op) {
        let last = self.pages.len() - 1;
        self.pages[last].ops.push(op);
    }

    fn line(&mut self, segments: Vec<Segment>, size: f32, centered: bool) {
        let height = size * LEADING;
        self.ensure_room(height);
        self.cursor -= height;

        let x = if centered {
            let width: f32 = segments.iter().map(|(f, t)| text_width(t, *f, size)).sum();
            ((PAGE_WIDTH - width) / 2.0).max(SIDE_MARGIN)
        } else {
            SIDE_MARGIN
        };
        let y = self.cursor + size * (LEADING - 1.0);
        self.emit(Op::Text { x, y, size, segments });
    }

    pub fn push(&mut self, block: &Block) {
        match block {
            Block::Title(text) => {
                self.line(vec![(Font::Bold, text.clone())], TITLE_SIZE, true);
            }
            Block::Centered(text) => {
                self.line(vec![(Font::Regular, text.clone())], BODY_SIZE, true);
            }
            Block::Heading(text) => {
                self.cursor -= BODY_SIZE * 0.5;
                // keep a heading with at least two lines of what follows
                self.ensure_room(HEADING_SIZE * LEADING + 2.0 * BODY_SIZE * LEADING);
                self.line(vec![(Font::Bold, text.clone())], HEADING_SIZE, false);
            }
            Block::Paragraph(runs) => {
                for segments in wrap(runs, BODY_SIZE, Self::text_width_available()) {
                    self.line(segments, BODY_SIZE, false);
                }
                self.cursor -= BODY_SIZE * 0.4;
            }
            Block::Table { headers, widths, rows } => self.table(headers, widths, rows),
            Block::Signatures(parties) => self.signatures(parties),
            Block::Space(points) => {
                self.cursor -= points;
                if self.cursor < BOTTOM_LIMIT {
                    self.new_page();
                }
            }
        }
    }

    fn table(&mut self, headers: &[String], widths: &[f32], rows: &[Vec<String>]) {
        let total = Self::text_width_available();
        let columns: Vec<f32> = widths.iter().map(|w| w * total).collect();

        let header = self.layout_row(headers, &columns, Font::Bold);
        self.ensure_room(header.0 + TABLE_SIZE * LEADING + 2.0 * CELL_PADDING);
        self.draw_row(&header, &columns, Some(HEADER_GRAY));

        for (index, row) in rows.iter().enumerate() {
            let laid_out = self.layout_row(row, &columns, Font::Regular);
            if !self.fits(laid_out.0) {
                self.new_page();
                self.draw_row(&header, &columns, Some(HEADER_GRAY));
            }
            let shade = (index % 2 == 0).then_some(ROW_GRAY);
            self.draw_row(&laid_out, &columns, shade);
        }
        self.cursor -= BODY_SIZE * 0.6;
    }

    fn layout_row(&self, cells: &[String], columns: &[f32], font: Font) -> (f32, Vec<Vec<Vec<Segment>>>) {
        let wrapped: Vec<Vec<Vec<Segment>>> = cells
            .iter()
            .zip(columns)
            .map(|(cell, width)| {
                let run = Run { text: cell.clone(), font, keep: false };
                wrap(&[run], TABLE_SIZE, width - 2.0 * CELL_PADDING)
            })
            .collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = lines as f32 * TABLE_SIZE * LEADING + 2.0 * CELL_PADDING;
        (height, wrapped)
    }

    fn draw_row(&mut self, row: &(f32, Vec<Vec<Vec<Segment>>>), columns: &[f32], shade: Option<f32>) {
        let (height, cells) = row;
        let top = self.cursor;
        if let Some(gray) = shade {
            self.emit(Op::Fill {
                x: SIDE_MARGIN,
                y: top - height,
                width: columns.iter().sum(),
                height: *height,
                gray,
            });
        }

        let line_height = TABLE_SIZE * LEADING;
        let mut x = SIDE_MARGIN;
        for (lines, width) in cells.iter().zip(columns) {
            for (k, segments) in lines.iter().enumerate() {
                let y = top - CELL_PADDING - (k as f32 + 1.0) * line_height + TABLE_SIZE * (LEADING - 1.0);
                self.emit(Op::Text {
                    x: x + CELL_PADDING,
                    y,
                    size: TABLE_SIZE,
                    segments: segments.clone(),
                });
            }
            x += width;
        }
        self.cursor -= height;
    }

    fn signatures(&mut self, parties: &[(String, String)]) {
        if parties.is_empty() {
            return;
        }
        let block_height = 50.0 + 2.0 * BODY_SIZE * LEADING;
        self.ensure_room(block_height);
        self.cursor -= 50.0;

        let column = Self::text_width_available() / parties.len() as f32;
        let rule_y = self.cursor;
        for (i, (role, name)) in parties.iter().enumerate() {
            let left = SIDE_MARGIN + i as f32 * column;
            self.emit(Op::Rule { x1: left + 20.0, x2: left + column - 20.0, y: rule_y });

            for (k, (font, text)) in [(Font::Bold, name), (Font::Regular, role)].into_iter().enumerate() {
                let width = text_width(text, font, BODY_SIZE);
                let x = left + ((column - width) / 2.0).max(0.0);
                let y = rule_y - (k as f32 + 1.0) * BODY_SIZE * LEADING;
                self.emit(Op::Text {
                    x,
                    y,
                    size: BODY_SIZE,
                    segments: vec![(font, text.clone())],
                });
            }
        }
        self.cursor -= 2.0 * BODY_SIZE * LEADING;
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Standard fonts take single-byte WinAnsi strings; unmappable characters become `?`
fn win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if unmappable {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

fn text_operations(x: f32, y: f32, size: f32, segments: &[Segment]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![x.into(), y.into()]),
    ];
    for (font, text) in segments {
        ops.push(Operation::new("Tf", vec![font.resource().into(), size.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn page_operations(page: &Page, number: usize, total: usize) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            Op::Text { x, y, size, segments } => ops.extend(text_operations(*x, *y, *size, segments)),
            Op::Fill { x, y, width, height, gray } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("g", vec![(*gray).into()]));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Op::Rule { x1, x2, y } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![0.5f32.into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    let footer = format!("Página {} de {}", number, total);
    let x = (PAGE_WIDTH - text_width(&footer, Font::Regular, FOOTER_SIZE)) / 2.0;
    ops.extend(text_operations(x, FOOTER_Y, FOOTER_SIZE, &[(Font::Regular, footer)]));
    ops
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Serialize composed pages. Streams are left uncompressed and no
/// timestamps or file identifiers are written, so equal pages give equal bytes.
pub fn write_pdf(pages: &[Page]) -> Result<Vec<u8>, DomainError> {
    let render_error = |e: lopdf::Error| DomainError::RenderError(e.to_string());

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        let content = Content {
            operations: page_operations(page, index + 1, total),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().map_err(render_error)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| DomainError::RenderError(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_texts(lines: &[Vec<Segment>]) -> Vec<String> {
        lines
            .iter()
            .map(|segments| segments.iter().map(|(_, t)| t.as_str()).collect())
            .collect()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_keep_run_is_never_split() {
        let runs = vec![
            Run::plain("a partir del "),
            Run::keep("1 de septiembre de 2024"),
            Run::plain(", en el domicilio"),
        ];
        // narrow enough that the date cannot share a line with much else
        let lines = line_texts(&wrap(&runs, 10.0, 110.0));

        assert!(lines.iter().any(|l| l.contains("1 de septiembre de 2024,")), "{:?}", lines);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "uno dos tres cuatro cinco seis siete ocho nueve diez ".repeat(10);
        let lines = wrap(&[Run::plain(text)], 10.0, 200.0);

        assert!(lines.len() > 1);
        for line in &lines {
            let width: f32 = line.iter().map(|(f, t)| text_width(t, *f, 10.0)).sum();
            assert!(width <= 200.01, "line too wide: {}", width);
        }
    }

    #[test]
    fn test_mixed_fonts_become_segments() {
        let lines = wrap(&[Run::bold("PRIMERA."), Run::plain(" OBJETO del contrato")], 10.0, 500.0);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0], (Font::Bold, "PRIMERA.".to_string()));
        assert_eq!(lines[0][1], (Font::Regular, " OBJETO del contrato".to_string()));
    }

    #[test]
    fn test_long_content_paginates_with_footer() {
        let mut composer = PageComposer::new();
        for _ in 0..120 {
            composer.push(&Block::Paragraph(vec![Run::plain("Texto de relleno para la prueba.")]));
        }
        let pages = composer.finish();
        assert!(pages.len() > 1);

        let bytes = write_pdf(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(contains(&bytes, format!("gina {} de {}", pages.len(), pages.len()).as_bytes()));
    }

    #[test]
    fn test_table_shades_alternate_rows() {
        let mut composer = PageComposer::new();
        composer.push(&Block::Table {
            headers: vec!["Nombre".into(), "Domicilio".into()],
            widths: vec![0.5, 0.5],
            rows: (0..4).map(|i| vec![format!("Persona {}", i), "Centro".into()]).collect(),
        });
        let pages = composer.finish();

        let fills = pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Fill { .. }))
            .count();
        // header plus rows 0 and 2
        assert_eq!(fills, 3);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi("Página"), b"P\xe1gina".to_vec());
        assert_eq!(win_ansi("a\u{4e2d}b"), b"a?b".to_vec());
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut composer = PageComposer::new();
            composer.push(&Block::Title("CONTRATO".into()));
            composer.push(&Block::Signatures(vec![("ARRENDADOR".into(), "Carlos Ruiz".into())]));
            write_pdf(&composer.finish()).unwrap()
        };
        assert_eq!(build(), build());
    }
}
