//! Page layout of the participants report.
//!
//! Coordinates are millimetres from the top-left corner of an A4 page and
//! text `y` is the baseline. The renderer flips them for PDF space.

use crate::domain::report::{Report, TokenCount};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 14.0;

const TITLE_Y: f32 = 22.0;
const DATE_Y: f32 = 30.0;
const TABLE_START_Y: f32 = 40.0;

const TABLE_FONT: f32 = 9.0;
const CELL_PADDING: f32 = 3.0;
/// 9pt Helvetica with 1.15 line spacing.
const LINE_HEIGHT: f32 = 3.65;
/// Average Helvetica glyph width as a fraction of the font size in mm.
const GLYPH_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 25.4 / 72.0;

pub const HEADERS: [&str; 5] = ["Nome", "Cognome", "Intolleranze", "Allergie", "Note"];
/// Notes get a fixed 50 mm; the rest share the remaining width.
const COLUMN_WIDTHS: [f32; 5] = [28.0, 28.0, 38.0, 38.0, 50.0];

/// Gap between table end and the statistics heading.
const STATS_GAP: f32 = 10.0;
/// Past this y the statistics start on a fresh page.
const STATS_BREAK_Y: f32 = 250.0;
/// Past this y the allergy block starts on a fresh page.
const ALLERGY_BREAK_Y: f32 = 270.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const PRIMARY: Rgb = Rgb(21, 50, 67);
pub const GREY: Rgb = Rgb(100, 100, 100);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const ROW_SHADE: Rgb = Rgb(245, 245, 245);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        color: Rgb,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text strings on this page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::FillRect { .. } => None,
        })
    }

    pub fn text_y(&self, needle: &str) -> Option<f32> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    /// Bottom edge of the table on its last page.
    pub table_end_y: f32,
}

struct Cursor {
    pages: Vec<Page>,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, weight: Weight, color: Rgb, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            weight,
            color,
            text: text.into(),
        });
    }
}

/// Greedy word wrap to at most `max_chars` per line; long words are cut.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn chars_per_line(width: f32) -> usize {
    let glyph = TABLE_FONT * PT_TO_MM * GLYPH_WIDTH_EM;
    ((width - 2.0 * CELL_PADDING) / glyph).floor().max(1.0) as usize
}

fn row_height(lines: usize) -> f32 {
    lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

fn draw_row(
    cur: &mut Cursor,
    y: f32,
    cells: &[Vec<String>; 5],
    height: f32,
    fill: Option<Rgb>,
    weight: Weight,
    color: Rgb,
) {
    if let Some(fill) = fill {
        cur.push(DrawOp::FillRect {
            x: MARGIN,
            y,
            w: COLUMN_WIDTHS.iter().sum(),
            h: height,
            color: fill,
        });
    }
    let mut x = MARGIN;
    for (lines, width) in cells.iter().zip(COLUMN_WIDTHS) {
        for (i, line) in lines.iter().enumerate() {
            let baseline = y + CELL_PADDING + (i as f32 + 1.0) * LINE_HEIGHT - 0.9;
            cur.text(x + CELL_PADDING, baseline, TABLE_FONT, weight, color, line.clone());
        }
        x += width;
    }
}

fn wrap_cells(cells: [&str; 5]) -> [Vec<String>; 5] {
    let mut out: [Vec<String>; 5] = Default::default();
    for (i, cell) in cells.iter().enumerate() {
        out[i] = wrap(cell, chars_per_line(COLUMN_WIDTHS[i]));
    }
    out
}

fn draw_header(cur: &mut Cursor, y: f32) -> f32 {
    let cells = wrap_cells(HEADERS);
    let height = row_height(1);
    draw_row(cur, y, &cells, height, Some(PRIMARY), Weight::Bold, WHITE);
    y + height
}

/// Body lines of a row that still fit between `y` and `bottom`.
fn lines_fitting(y: f32, bottom: f32) -> usize {
    ((bottom - y - 2.0 * CELL_PADDING) / LINE_HEIGHT).floor().max(0.0) as usize
}

/// Splits every cell after its first `n` lines; the tail keeps the rest.
fn split_cells(cells: &mut [Vec<String>; 5], n: usize) -> [Vec<String>; 5] {
    let mut tail: [Vec<String>; 5] = Default::default();
    for (cell, rest) in cells.iter_mut().zip(tail.iter_mut()) {
        *rest = cell.split_off(n.min(cell.len()));
    }
    tail
}

/// Table with a repeated header on each page. Rows taller than a page are
/// split across pages. Returns the bottom edge.
fn draw_table(cur: &mut Cursor, report: &Report) -> f32 {
    let bottom = PAGE_HEIGHT - MARGIN;
    let fresh_page_lines = lines_fitting(MARGIN + row_height(1), bottom);
    let mut y = draw_header(cur, TABLE_START_Y);

    for (idx, row) in report.rows.iter().enumerate() {
        let fill = (idx % 2 == 1).then_some(ROW_SHADE);
        let mut cells = wrap_cells(row.cells());

        loop {
            let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
            let height = row_height(lines);
            if y + height <= bottom {
                draw_row(cur, y, &cells, height, fill, Weight::Regular, BLACK);
                y += height;
                break;
            }

            let fits = lines_fitting(y, bottom);
            if lines > fresh_page_lines && fits > 0 {
                let rest = split_cells(&mut cells, fits);
                draw_row(cur, y, &cells, row_height(fits), fill, Weight::Regular, BLACK);
                cells = rest;
            }
            cur.new_page();
            y = draw_header(cur, MARGIN);
        }
    }
    y
}

fn draw_breakdown(cur: &mut Cursor, mut y: f32, heading: &str, counts: &[TokenCount]) -> f32 {
    let bottom = PAGE_HEIGHT - MARGIN;
    cur.text(MARGIN, y, 11.0, Weight::Bold, BLACK, heading);
    y += 7.0;
    for c in counts {
        if y > bottom {
            cur.new_page();
            y = 20.0;
        }
        cur.text(20.0, y, 11.0, Weight::Regular, BLACK, format!("- {}: {}", c.token, c.count));
        y += 6.0;
    }
    y
}

/// Lay out `report` under `title`.
pub fn layout(report: &Report, title: &str) -> Layout {
    let mut cur = Cursor::new();

    cur.text(MARGIN, TITLE_Y, 18.0, Weight::Regular, PRIMARY, title);
    cur.text(
        MARGIN,
        DATE_Y,
        11.0,
        Weight::Regular,
        GREY,
        format!("Generato il: {}", report.generated_at.format("%d/%m/%Y")),
    );

    let table_end_y = draw_table(&mut cur, report);

    let heading_y = table_end_y + STATS_GAP;
    let mut y = if heading_y > STATS_BREAK_Y {
        cur.new_page();
        cur.text(MARGIN, 20.0, 14.0, Weight::Regular, PRIMARY, "Riepilogo Statistiche");
        30.0
    } else {
        cur.text(MARGIN, heading_y, 14.0, Weight::Regular, PRIMARY, "Riepilogo Statistiche");
        heading_y + 10.0
    };

    cur.text(
        MARGIN,
        y,
        11.0,
        Weight::Bold,
        BLACK,
        format!("Totale Ospiti: {}", report.stats.total),
    );
    y += 10.0;

    if !report.stats.intolerances.is_empty() {
        y = draw_breakdown(&mut cur, y, "Dettaglio Intolleranze:", &report.stats.intolerances);
        y += 5.0;
    }

    if !report.stats.allergies.is_empty() {
        if y > ALLERGY_BREAK_Y {
            cur.new_page();
            y = 20.0;
        }
        draw_breakdown(&mut cur, y, "Dettaglio Allergie:", &report.stats.allergies);
    }

    Layout {
        pages: cur.pages,
        table_end_y,
    }
}
