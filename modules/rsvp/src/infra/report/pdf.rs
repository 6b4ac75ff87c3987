//! printpdf renderer for a laid-out report.
//!
//! Uses the builtin Helvetica faces, which only carry the WinAnsi
//! (Windows-1252) repertoire. Other characters are printed as `?`.

use std::borrow::Cow;

use anyhow::Context;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
    Rgb as PdfRgb,
};

use crate::domain::ports::ReportRenderer;
use crate::domain::report::Report;
use crate::infra::report::layout::{self, DrawOp, Rgb, Weight, PAGE_HEIGHT, PAGE_WIDTH};

pub const APPLICATION_PDF: &str = "application/pdf";

/// Drawn in place of characters the builtin fonts cannot encode.
pub const MISSING_GLYPH: char = '?';

/// Windows-1252 characters outside Latin-1.
const WIN_ANSI_EXTRA: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

fn win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRA.contains(&c)
}

/// `text` with every character outside WinAnsi replaced by [`MISSING_GLYPH`].
pub fn encodable_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(win_ansi) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if win_ansi(c) { c } else { MISSING_GLYPH })
                .collect(),
        )
    }
}

pub struct PdfReportRenderer {
    title: String,
}

impl PdfReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        f32::from(c.0) / 255.0,
        f32::from(c.1) / 255.0,
        f32::from(c.2) / 255.0,
        None,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            weight,
            color: c,
            text,
        } => {
            let font = match weight {
                Weight::Regular => &fonts.regular,
                Weight::Bold => &fonts.bold,
            };
            layer.set_fill_color(color(*c));
            layer.use_text(encodable_text(text), *size, Mm(*x), Mm(PAGE_HEIGHT - *y), font);
        }
        DrawOp::FillRect { x, y, w, h, color: c } => {
            layer.set_fill_color(color(*c));
            layer.add_rect(Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - *y - *h),
                Mm(*x + *w),
                Mm(PAGE_HEIGHT - *y),
            ));
        }
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn content_type(&self) -> &'static str {
        APPLICATION_PDF
    }

    fn render(&self, report: &Report) -> anyhow::Result<Vec<u8>> {
        let laid_out = layout::layout(report, &self.title);

        let (doc, first_page, first_layer) =
            PdfDocument::new(self.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .context("failed to load Helvetica")?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .context("failed to load Helvetica-Bold")?,
        };

        for (idx, page) in laid_out.pages.iter().enumerate() {
            let layer = if idx == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (p, l) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                doc.get_page(p).get_layer(l)
            };
            for op in &page.ops {
                draw(&layer, &fonts, op);
            }
        }

        doc.save_to_bytes().context("failed to serialize PDF")
    }
}
