//! Input validation for exam dates and entered values.

use crate::classify::parse_decimal;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Validate an exam date.
///
/// The date is required and must not lie strictly in the future.
pub fn validate_date(date: Option<DateTime<Utc>>) -> Result<DateTime<Utc>> {
    let date = date.ok_or_else(|| {
        tracing::error!("exam date is required");
        Error::MissingValue("exam date".to_string())
    })?;

    if date > Utc::now() {
        tracing::error!("exam date {date} lies in the future");
        return Err(Error::FutureDate);
    }

    Ok(date)
}

/// Validate a raw numeric entry for the named field.
///
/// An empty or whitespace-only entry returns `Ok(None)`: an unfilled
/// field is legitimate. A comma decimal separator is normalized before
/// parsing; unparseable and negative values are rejected.
pub fn validate_numeric_value(raw: &str, field: &str) -> Result<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value = parse_decimal(raw).ok_or_else(|| {
        tracing::error!("invalid value for {field}: {raw}");
        Error::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        }
    })?;

    if value < 0.0 {
        tracing::error!("negative value not allowed ({field})");
        return Err(Error::NegativeValue(field.to_string()));
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_missing_date_is_rejected() {
        let err = validate_date(None).unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
    }

    #[test]
    fn test_future_date_is_rejected() {
        let tomorrow = Utc::now() + Duration::days(1);
        let err = validate_date(Some(tomorrow)).unwrap_err();
        assert!(matches!(err, Error::FutureDate));
    }

    #[test]
    fn test_past_date_passes() {
        let yesterday = Utc::now() - Duration::days(1);
        assert_eq!(validate_date(Some(yesterday)).unwrap(), yesterday);
    }

    #[test]
    fn test_blank_value_is_absent_not_an_error() {
        assert_eq!(validate_numeric_value("", "Glicose").unwrap(), None);
        assert_eq!(validate_numeric_value("   ", "Glicose").unwrap(), None);
    }

    #[test]
    fn test_comma_separator_is_normalized() {
        assert_eq!(
            validate_numeric_value("95,5", "Glicose").unwrap(),
            Some(95.5)
        );
    }

    #[test]
    fn test_unparseable_value_is_rejected() {
        let err = validate_numeric_value("noventa", "Glicose").unwrap_err();
        match err {
            Error::InvalidNumber { field, value } => {
                assert_eq!(field, "Glicose");
                assert_eq!(value, "noventa");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let err = validate_numeric_value("-5", "Glicose").unwrap_err();
        assert!(matches!(err, Error::NegativeValue(field) if field == "Glicose"));
    }
}
