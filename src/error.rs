// src/error.rs

//! Unified error handling for the crawler library.
//!
//! [`AppError`] covers everything that is surfaced to the caller as an `Err`:
//! configuration mistakes found before a request is sent. Transport and parse
//! failures are reported inside an [`Envelope`](crate::models::Envelope)
//! instead, but their error kinds live here too.

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A query field failed its validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A query field has no wire name in the key map
    #[error("'{key}' is not in key map.")]
    UnmappedKey { key: String },

    /// A query field collides with a crawler property name
    #[error("'{key}' is a reserved crawler property and can not be sent as a query field.")]
    ReservedKey { key: String },

    /// Host is not an http(s) URL
    #[error("'{host}' is not a valid host.")]
    InvalidHost { host: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table parsing failed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unmapped-key error.
    pub fn unmapped(key: impl Into<String>) -> Self {
        Self::UnmappedKey { key: key.into() }
    }

    /// Create a reserved-key error.
    pub fn reserved(key: impl Into<String>) -> Self {
        Self::ReservedKey { key: key.into() }
    }

    /// Create an invalid-host error.
    pub fn invalid_host(host: impl Into<String>) -> Self {
        Self::InvalidHost { host: host.into() }
    }
}

/// A query field value rejected by its validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value does not match the field's pattern
    #[error("'{value}' is not a valid {label} format. Eg. {example}")]
    Format {
        field: &'static str,
        label: &'static str,
        value: String,
        example: &'static str,
    },

    /// Value is not one of the accepted codes
    #[error("'{value}' is not a valid {label}. Eg. {example}")]
    Choice {
        field: &'static str,
        label: &'static str,
        value: String,
        example: &'static str,
    },

    /// Free-text value is blank after trimming
    #[error("{label} could not be empty.")]
    Empty {
        field: &'static str,
        label: &'static str,
    },

    /// Numeric value outside its inclusive bounds
    #[error("'{value}' is not in range [{min}, {max}].")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Numeric value below its lower bound
    #[error("'{value}' is not a valid {label}. Must be at least {min}.")]
    BelowMinimum {
        field: &'static str,
        label: &'static str,
        value: i64,
        min: i64,
    },
}

impl ValidationError {
    /// Name of the offending query field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Format { field, .. }
            | Self::Choice { field, .. }
            | Self::Empty { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::BelowMinimum { field, .. } => field,
        }
    }
}

/// Failure decoding an `"n-m"` lesson range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonError {
    #[error("Too many or too few lessons. Must be 2.")]
    TokenCount,

    #[error("First lesson can not be greater than the last.")]
    Order,

    #[error("Lesson can not be zero.")]
    Zero,

    #[error("Lesson can not be greater than {max}.")]
    ExceedsMax { max: u32 },

    #[error("Some lessons is not correct.")]
    NonNumeric,
}

/// Failure turning an HTML fragment into records.
///
/// Any of these rejects the whole table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Too many or too few fields in row {row}: expected {expected}, found {found}.")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{source}")]
    Lesson { row: usize, source: LessonError },

    #[error("'{value}' is not a number ({field}, row {row}).")]
    Number {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Cell {cell} of row {row} has no text content.")]
    MalformedCell { row: usize, cell: usize },

    #[error("Parsing the {table} table is not implemented.")]
    NotImplemented { table: &'static str },
}
