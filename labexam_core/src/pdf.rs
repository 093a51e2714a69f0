//! PDF report rendering for a result set.
//!
//! Output is an A4 document: title and date header, then one section per
//! category with entries, each section a bold header paragraph plus a
//! gridded table with a filled header row. Pagination is handled by hand:
//! a new page starts whenever the cursor would cross the bottom margin.

use crate::classify::classify;
use crate::format::filled_categories;
use crate::types::{ExamResult, ResultSet};
use crate::{Error, Result};
use printpdf::*;
use printpdf::path::{PaintMode, WindingOrder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufWriter;
use std::str::FromStr;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
/// 1 inch on every side
const MARGIN_MM: f32 = 25.4;

/// Fixed column widths in mm (2 / 1.5 / 1.5 / 1 inch)
const PORTRAIT_COLUMNS_MM: [f32; 4] = [50.8, 38.1, 38.1, 25.4];
/// Fixed column widths in mm (3 / 2 / 2 / 1 inch)
const LANDSCAPE_COLUMNS_MM: [f32; 4] = [76.2, 50.8, 50.8, 25.4];

const HEADER_ROW_HEIGHT_MM: f32 = 9.0;
const ROW_HEIGHT_MM: f32 = 7.0;
const CELL_PADDING_MM: f32 = 2.0;

const COLOR_HEADER_FILL: (u8, u8, u8) = (128, 128, 128);
const COLOR_HEADER_TEXT: (u8, u8, u8) = (245, 245, 245);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);

const TABLE_HEADERS: [&str; 4] = ["Exame", "Resultado", "Referência", "Status"];

/// Page orientation for the exported report
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// (width, height) in mm; landscape swaps the A4 sides
    fn page_size(self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (PAGE_WIDTH_MM, PAGE_HEIGHT_MM),
            Orientation::Landscape => (PAGE_HEIGHT_MM, PAGE_WIDTH_MM),
        }
    }

    fn column_widths(self) -> [f32; 4] {
        match self {
            Orientation::Portrait => PORTRAIT_COLUMNS_MM,
            Orientation::Landscape => LANDSCAPE_COLUMNS_MM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        if raw.eq_ignore_ascii_case("portrait") {
            Ok(Orientation::Portrait)
        } else if raw.eq_ignore_ascii_case("landscape") {
            Ok(Orientation::Landscape)
        } else {
            Err(Error::InvalidArgument(format!(
                "orientation '{raw}': use 'portrait' or 'landscape'"
            )))
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders one result set to PDF bytes; construct a new exporter per
/// result set.
pub struct PdfExporter {
    results: ResultSet,
    orientation: Orientation,
}

impl PdfExporter {
    pub fn new(results: ResultSet) -> Self {
        Self {
            results,
            orientation: Orientation::default(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Set the orientation from raw text.
    ///
    /// Anything but `portrait`/`landscape` fails with
    /// [`Error::InvalidArgument`] and leaves the prior orientation
    /// unchanged.
    pub fn set_orientation_str(&mut self, raw: &str) -> Result<()> {
        self.orientation = raw.parse()?;
        Ok(())
    }

    /// Export the complete, finalized document.
    ///
    /// A pure function of the exporter's current state; categories with
    /// no entries produce no section, identically to the text formatter.
    pub fn export(&self) -> Result<Vec<u8>> {
        let (width, height) = self.orientation.page_size();
        let title = format!("Resultados de Exames - {}", self.results.exam_type);
        let mut page = PageWriter::new(&title, width, height)?;

        page.text(&title, 16.0, MARGIN_MM, COLOR_BLACK, true);
        page.advance(8.0);
        page.text(
            &format!("Data: {}", self.results.date),
            11.0,
            MARGIN_MM,
            COLOR_BLACK,
            false,
        );
        page.advance(12.0);

        let columns = self.orientation.column_widths();
        for (category, exams) in filled_categories(&self.results) {
            // Keep the section header attached to at least the first row.
            page.ensure_room(8.0 + HEADER_ROW_HEIGHT_MM + ROW_HEIGHT_MM);
            page.text(category, 13.0, MARGIN_MM, COLOR_BLACK, true);
            page.advance(8.0);
            self.draw_table(&mut page, exams, &columns);
            page.advance(10.0);
        }

        let bytes = page.finish()?;
        tracing::info!("PDF exported ({} bytes)", bytes.len());
        Ok(bytes)
    }

    fn draw_table(
        &self,
        page: &mut PageWriter,
        exams: &BTreeMap<String, ExamResult>,
        columns: &[f32; 4],
    ) {
        page.draw_row(
            &TABLE_HEADERS.map(String::from),
            columns,
            HEADER_ROW_HEIGHT_MM,
            11.0,
            Some(COLOR_HEADER_FILL),
            COLOR_HEADER_TEXT,
            true,
        );

        for (name, result) in exams {
            let cells = [
                name.clone(),
                format!("{} {}", result.value_label(), result.unit),
                format!("{} {}", result.reference, result.unit),
                classify(result.value, &result.reference).to_string(),
            ];
            page.draw_row(
                &cells,
                columns,
                ROW_HEIGHT_MM,
                10.0,
                None,
                COLOR_BLACK,
                false,
            );
        }
    }
}

fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn pdf_err(e: impl std::fmt::Display) -> Error {
    Error::Pdf(e.to_string())
}

/// Cursor-based page writer over a printpdf document
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    /// Current baseline, in mm from the page bottom
    y: f32,
}

impl PageWriter {
    fn new(title: &str, width: f32, height: f32) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            width,
            height,
            y: height - MARGIN_MM,
        })
    }

    /// Start a fresh page when fewer than `needed` mm remain above the
    /// bottom margin
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self.doc.add_page(Mm(self.width), Mm(self.height), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = self.height - MARGIN_MM;
        }
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn text(&self, text: &str, size: f32, x: f32, color: (u8, u8, u8), bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.set_outline_color(rgb(COLOR_BLACK));
        self.layer.set_outline_thickness(0.75);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        let ring = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Draw one table row with full cell borders, breaking the page
    /// first if the row would not fit
    #[allow(clippy::too_many_arguments)]
    fn draw_row(
        &mut self,
        cells: &[String; 4],
        columns: &[f32; 4],
        height: f32,
        size: f32,
        fill: Option<(u8, u8, u8)>,
        text_color: (u8, u8, u8),
        bold: bool,
    ) {
        self.ensure_room(height);
        let top = self.y;
        let bottom = top - height;
        let table_width: f32 = columns.iter().sum();

        if let Some(color) = fill {
            self.fill_rect(MARGIN_MM, bottom, table_width, height, color);
        }

        // Grid: shared edges are drawn per row so page breaks keep the
        // frame closed.
        self.line(MARGIN_MM, top, MARGIN_MM + table_width, top);
        self.line(MARGIN_MM, bottom, MARGIN_MM + table_width, bottom);
        let mut x = MARGIN_MM;
        self.line(x, top, x, bottom);
        for column in columns {
            x += column;
            self.line(x, top, x, bottom);
        }

        self.y = bottom + 2.2;
        let mut x = MARGIN_MM;
        for (cell, column) in cells.iter().zip(columns) {
            self.text(
                &fit_text(cell, column - 2.0 * CELL_PADDING_MM, size),
                size,
                x + CELL_PADDING_MM,
                text_color,
                bold,
            );
            x += column;
        }
        self.y = bottom;
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut buffer = BufWriter::new(Vec::new());
        self.doc.save(&mut buffer).map_err(pdf_err)?;
        buffer.into_inner().map_err(pdf_err)
    }
}

/// Truncate text to roughly fit a column, appending an ellipsis.
///
/// Helvetica averages about half an em per glyph; close enough for fixed
/// column layouts.
fn fit_text(text: &str, width_mm: f32, size_pt: f32) -> String {
    let glyph_mm = size_pt * 0.5 * 0.3528;
    let max_chars = (width_mm / glyph_mm).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    fitted.push('…');
    fitted
}
