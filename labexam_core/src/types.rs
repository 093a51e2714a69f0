//! Core domain types for the laboratory exam manager.
//!
//! This module defines the fundamental types used throughout the system:
//! - Reference ranges and their catalog entries
//! - Exam profiles (named selections of categories and exams)
//! - Single exam results and full result sets
//! - The status classification of a measured value

use crate::classify;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Status
// ============================================================================

/// Classification of a measured value relative to its reference range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Below,
    Normal,
    Above,
    Unknown,
}

impl Status {
    /// Report label for this status. The same label must appear in every
    /// output format for the same data.
    pub fn label(self) -> &'static str {
        match self {
            Status::Below => "BAIXO",
            Status::Normal => "NORMAL",
            Status::Above => "ALTO",
            Status::Unknown => "N/A",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Reference Range
// ============================================================================

/// Clinically expected bounds for one exam, with a unit.
///
/// Either bound may be absent, meaning unbounded on that side. A literal
/// zero lower bound (e.g. total cholesterol) is a real bound, not "no
/// lower limit". The gender-specific fields are carried data; the default
/// catalog never populates them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
    #[serde(default)]
    pub gender_specific: bool,
    #[serde(default)]
    pub male_min: Option<f64>,
    #[serde(default)]
    pub male_max: Option<f64>,
    #[serde(default)]
    pub female_min: Option<f64>,
    #[serde(default)]
    pub female_max: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ReferenceRange {
    /// Render the range as the shared `"min-max"` text contract.
    ///
    /// An absent bound leaves its side empty; the classifier degrades such
    /// a label to [`Status::Unknown`] rather than guessing.
    pub fn reference_label(&self) -> String {
        let lo = self.min.map(decimal_label).unwrap_or_default();
        let hi = self.max.map(decimal_label).unwrap_or_default();
        format!("{lo}-{hi}")
    }
}

/// Render a float the way results are displayed: integral values keep a
/// single trailing decimal (`12.0`), everything else prints minimally.
pub fn decimal_label(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

// ============================================================================
// Exam Profile
// ============================================================================

/// A named, reusable selection of exam categories and their exams.
///
/// The name is the unique store key and immutable after creation. Default
/// profiles are seeded from the reference catalog and protected against
/// deletion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExamProfile {
    pub name: String,
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl ExamProfile {
    /// Total number of exams across all categories
    pub fn exam_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Number of categories with at least one exam
    pub fn category_count(&self) -> usize {
        self.categories.values().filter(|exams| !exams.is_empty()).count()
    }

    /// Bump the last-used timestamp. Every fetch for use counts.
    pub fn mark_used(&mut self) {
        self.last_used = Utc::now();
    }
}

/// Read projection of a stored profile, as returned by
/// [`crate::ProfileStore::list`]. Building one never mutates the record.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub description: String,
    pub exam_count: usize,
    pub category_count: usize,
    pub is_default: bool,
    pub is_favorite: bool,
    pub last_used: DateTime<Utc>,
}

// ============================================================================
// Exam Results
// ============================================================================

/// One measured value, frozen at entry time.
///
/// The status is derived through the classifier when the result is built;
/// formatter and exporter re-derive it through the same routine so all
/// outputs agree.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExamResult {
    pub value: f64,
    pub unit: String,
    pub reference: String,
    pub status: Status,
}

impl ExamResult {
    /// Build a result for a value measured against a catalog range
    pub fn new(value: f64, range: &ReferenceRange) -> Self {
        let reference = range.reference_label();
        Self {
            value,
            unit: range.unit.clone(),
            status: classify::classify(value, &reference),
            reference,
        }
    }

    /// The value as it appears in reports
    pub fn value_label(&self) -> String {
        decimal_label(self.value)
    }
}

/// The full set of entered values for one exam session, grouped by
/// category. Categories or exams with no entered value are simply absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultSet {
    pub exam_type: String,
    pub date: String,
    pub results: BTreeMap<String, BTreeMap<String, ExamResult>>,
}

impl ResultSet {
    pub fn new(exam_type: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            exam_type: exam_type.into(),
            date: date.into(),
            results: BTreeMap::new(),
        }
    }

    /// Validate a raw entry against the catalog and store it.
    ///
    /// Returns `Ok(false)` for a blank entry (an unfilled field is
    /// legitimate, not an error). Unknown category/exam pairs are
    /// rejected, as are unparseable or negative values.
    pub fn record(
        &mut self,
        catalog: &crate::ReferenceCatalog,
        category: &str,
        exam: &str,
        raw: &str,
    ) -> Result<bool> {
        let range = catalog
            .range(category, exam)
            .ok_or_else(|| Error::NotFound(format!("exam '{category}/{exam}'")))?;

        let Some(value) = crate::validate::validate_numeric_value(raw, exam)? else {
            return Ok(false);
        };

        self.insert(category, exam, ExamResult::new(value, range));
        Ok(true)
    }

    /// Insert an already-built result
    pub fn insert(&mut self, category: &str, exam: &str, result: ExamResult) {
        self.results
            .entry(category.to_string())
            .or_default()
            .insert(exam.to_string(), result);
    }

    /// Number of filled-in exams across all categories
    pub fn entry_count(&self) -> usize {
        self.results.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}
