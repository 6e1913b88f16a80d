//! Form definitions backing the back-office pages.
//!
//! Forms hold raw user input. Converting one into its request payload runs
//! every local check; a form that fails never reaches the gateway.

use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod housing;
pub mod riders;
pub mod spare_parts;
pub mod vehicles;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("new {field} must differ from the current one")]
    Unchanged { field: &'static str },

    #[error("invalid {field}: {source}")]
    InvalidValue {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl FormError {
    /// Inline message shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Validation(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
                fields.sort_unstable();
                format!("Please fill in the required fields: {}.", fields.join(", "))
            }
            FormError::InvalidNumber { field, .. } => format!("{field} must be a valid number."),
            FormError::Unchanged { field } => {
                format!("The new {field} must be different from the current {field}.")
            }
            FormError::InvalidValue { field, source } => format!("Invalid {field}: {source}."),
            FormError::InvalidDate(_) => "Dates must use the YYYY-MM-DD format.".to_string(),
        }
    }
}

/// Wraps a value-object error with the name of the offending field.
pub(crate) fn constrained<T>(
    field: &'static str,
    result: Result<T, TypeConstraintError>,
) -> Result<T, FormError> {
    result.map_err(|source| FormError::InvalidValue { field, source })
}

pub(crate) fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, FormError> {
    raw.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Blank input means "not provided".
pub(crate) fn parse_optional_number<T: FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<Option<T>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field, raw).map(Some)
}

pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed_before_parsing() {
        assert_eq!(parse_number::<i64>("mileage", " 1200 ").ok(), Some(1200));
        assert!(matches!(
            parse_number::<i64>("mileage", "12a"),
            Err(FormError::InvalidNumber {
                field: "mileage",
                ..
            })
        ));
    }

    #[test]
    fn blank_optional_values_are_none() {
        assert_eq!(parse_optional_number::<u32>("capacity", "  ").ok(), Some(None));
        assert_eq!(optional_text("  "), None);
        assert_eq!(parse_optional_date("").ok(), Some(None));
        assert!(parse_optional_date("01/05/2024").is_err());
    }
}
