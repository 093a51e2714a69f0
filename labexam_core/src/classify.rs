//! Value classification against `"min-max"` reference labels.
//!
//! This is the single shared parsing routine for the reference-range text
//! contract. Formatter, exporter and result construction all classify
//! through here, which is what keeps their status output consistent.

use crate::types::Status;

/// Parse a decimal accepting either `.` or `,` as the separator
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// Split a `"min-max"` label into its bounds.
///
/// Anything that does not yield exactly two numeric tokens is `None`.
pub fn parse_reference(reference: &str) -> Option<(f64, f64)> {
    let mut parts = reference.split('-');
    let min: f64 = parts.next()?.trim().parse().ok()?;
    let max: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((min, max))
}

/// Classify a value against a reference label.
///
/// Bounds are inclusive of normal: a value equal to either bound is
/// [`Status::Normal`]. A malformed label degrades to [`Status::Unknown`]
/// instead of failing.
pub fn classify(value: f64, reference: &str) -> Status {
    let Some((min, max)) = parse_reference(reference) else {
        return Status::Unknown;
    };

    if value < min {
        Status::Below
    } else if value > max {
        Status::Above
    } else {
        Status::Normal
    }
}

/// Classify a raw text value, normalizing the decimal separator first.
/// An unparseable value degrades to [`Status::Unknown`].
pub fn classify_str(value: &str, reference: &str) -> Status {
    match parse_decimal(value) {
        Some(v) => classify(v, reference),
        None => Status::Unknown,
    }
}
