//! Plain-text and fixed-width tabular rendering of a result set.
//!
//! The line structure here is a de facto text protocol: header/underline
//! pairing, blank-line separators between categories, and the
//! ` | `-separated table rows must not drift.

use crate::classify::classify;
use crate::types::{ExamResult, ResultSet};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

/// Sentinel returned by [`ResultFormatter::format_tabular`] when no exam
/// was filled in at all.
pub const NO_EXAMS_SENTINEL: &str = "No exams filled.";

const TABLE_HEADERS: [&str; 4] = ["Exame", "Resultado", "Referência", "Status"];

/// Renders one result set; construct a new formatter per result set.
///
/// Both renderings are memoized for the formatter's lifetime, so repeated
/// calls return byte-identical strings without recomputation.
pub struct ResultFormatter {
    results: ResultSet,
    cached_text: OnceCell<String>,
    cached_table: OnceCell<String>,
}

enum Row {
    Blank,
    Category(String),
    Exam([String; 4]),
}

impl ResultFormatter {
    pub fn new(results: ResultSet) -> Self {
        Self {
            results,
            cached_text: OnceCell::new(),
            cached_table: OnceCell::new(),
        }
    }

    pub fn result_set(&self) -> &ResultSet {
        &self.results
    }

    /// Simple text representation: one header/underline pair per
    /// category with entries, one line per exam, blank line between
    /// categories. Empty categories are skipped entirely.
    pub fn format_text(&self) -> &str {
        self.cached_text.get_or_init(|| self.render_text())
    }

    /// Fixed-width table representation. Returns
    /// [`NO_EXAMS_SENTINEL`] when nothing was filled in.
    pub fn format_tabular(&self) -> &str {
        self.cached_table.get_or_init(|| self.render_table())
    }

    fn render_text(&self) -> String {
        let mut lines = vec![
            format!("Resultados de Exames - {}", self.results.exam_type),
            format!("Data: {}", self.results.date),
            String::new(),
        ];

        for (category, exams) in filled_categories(&self.results) {
            lines.push(category.clone());
            lines.push("-".repeat(category.chars().count()));
            for (name, result) in exams {
                lines.push(format!(
                    "{}: {} {} (Ref: {} {}) - {}",
                    name,
                    result.value_label(),
                    result.unit,
                    result.reference,
                    result.unit,
                    classify(result.value, &result.reference)
                ));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn render_table(&self) -> String {
        let mut rows = Vec::new();
        for (category, exams) in filled_categories(&self.results) {
            rows.push(Row::Blank);
            rows.push(Row::Category(category.to_uppercase()));
            for (name, result) in exams {
                rows.push(Row::Exam([
                    name.clone(),
                    format!("{} {}", result.value_label(), result.unit),
                    format!("{} {}", result.reference, result.unit),
                    classify(result.value, &result.reference).to_string(),
                ]));
            }
        }

        if rows.is_empty() {
            return NO_EXAMS_SENTINEL.to_string();
        }

        // Column widths: max display width per column over header cells,
        // exam cells and category labels. Character counts, not bytes,
        // so accented names line up.
        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &rows {
            match row {
                Row::Category(label) => widths[0] = widths[0].max(label.chars().count()),
                Row::Exam(cells) => {
                    for (width, cell) in widths.iter_mut().zip(cells) {
                        *width = (*width).max(cell.chars().count());
                    }
                }
                Row::Blank => {}
            }
        }
        let total_width = widths.iter().sum::<usize>() + 9;

        let header = format!(
            "{:<w0$} | {:<w1$} | {:<w2$} | {:<w3$}",
            TABLE_HEADERS[0],
            TABLE_HEADERS[1],
            TABLE_HEADERS[2],
            TABLE_HEADERS[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
        let separator = "-".repeat(header.chars().count());

        let mut lines = vec![
            format!("Resultados de Exames - {}", self.results.exam_type),
            format!("Data: {}", self.results.date),
            String::new(),
            header,
            separator,
        ];

        for row in &rows {
            match row {
                Row::Blank => lines.push(String::new()),
                Row::Category(label) => {
                    lines.push(format!("{label:^total_width$}"));
                }
                Row::Exam(cells) => lines.push(format!(
                    "{:<w0$} | {:<w1$} | {:<w2$} | {:<w3$}",
                    cells[0],
                    cells[1],
                    cells[2],
                    cells[3],
                    w0 = widths[0],
                    w1 = widths[1],
                    w2 = widths[2],
                    w3 = widths[3],
                )),
            }
        }

        lines.join("\n")
    }
}

/// Categories with at least one entry, in result-set order
pub(crate) fn filled_categories(
    results: &ResultSet,
) -> impl Iterator<Item = (&String, &BTreeMap<String, ExamResult>)> {
    results
        .results
        .iter()
        .filter(|(_, exams)| !exams.is_empty())
}
