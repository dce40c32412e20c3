//! Per-field validators.
//!
//! Every validator is a pure function from an optional raw value to an
//! optional normalized value. `None` means "not provided" and always passes
//! through untouched; a present value is either accepted (possibly trimmed)
//! or rejected with a [`ValidationError`] naming the field.

pub mod calendar;
pub mod enrollment;
pub mod lesson;

use regex::Regex;

use crate::error::ValidationError;

pub use calendar::validate_calendar;
pub use enrollment::validate_enrollment;
pub use lesson::{MAX_LESSON, parse_lessons};

/// Outcome of a single field validator.
pub type Validated<T> = Result<Option<T>, ValidationError>;

/// Static description of a query field, used in error messages.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire-independent field name, e.g. `semesterID`
    pub name: &'static str,
    /// Human-readable label, e.g. `semester ID`
    pub label: &'static str,
    /// Example of an accepted value
    pub example: &'static str,
}

/// Accept the value only if `pattern` matches it in full.
fn pattern(field: FieldSpec, re: &Regex, value: Option<&str>) -> Validated<String> {
    match value {
        None => Ok(None),
        Some(v) if re.is_match(v) => Ok(Some(v.to_string())),
        Some(v) => Err(ValidationError::Format {
            field: field.name,
            label: field.label,
            value: v.to_string(),
            example: field.example,
        }),
    }
}

/// Like [`pattern`], for fields that take one of a few fixed codes.
fn choice(field: FieldSpec, re: &Regex, value: Option<&str>) -> Validated<String> {
    pattern(field, re, value).map_err(|_| ValidationError::Choice {
        field: field.name,
        label: field.label,
        value: value.unwrap_or_default().to_string(),
        example: field.example,
    })
}

/// Trim the value and reject it if nothing is left.
fn non_blank(field: FieldSpec, value: Option<&str>) -> Validated<String> {
    match value.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ValidationError::Empty {
            field: field.name,
            label: field.label,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

fn in_range(field: FieldSpec, value: Option<i64>, min: i64, max: i64) -> Validated<i64> {
    match value {
        None => Ok(None),
        Some(v) if (min..=max).contains(&v) => Ok(Some(v)),
        Some(v) => Err(ValidationError::OutOfRange {
            field: field.name,
            value: v,
            min,
            max,
        }),
    }
}

fn at_least(field: FieldSpec, value: Option<i64>, min: i64) -> Validated<i64> {
    match value {
        None => Ok(None),
        Some(v) if v >= min => Ok(Some(v)),
        Some(v) => Err(ValidationError::BelowMinimum {
            field: field.name,
            label: field.label,
            value: v,
            min,
        }),
    }
}

/// Compile an anchored pattern known at build time.
fn anchored(re: &str) -> Regex {
    Regex::new(re).expect("validator pattern must compile")
}
