//! Uniform `{status, data, message}` result wrapper.
//!
//! The same shape is used twice:
//!
//! - transport layer: `200` on success, the remote status (or `500` when the
//!   request never completed) on failure, with the raw body in `data`;
//! - parse layer: `200` with the parsed table, or `400` with an empty `data`
//!   object and the message of whatever went wrong first.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub const STATUS_OK: u16 = 200;
pub const STATUS_PARSE_FAILED: u16 = 400;
pub const STATUS_TRANSPORT_FAILED: u16 = 500;

/// Result wrapper returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: T,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn new(status: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status,
            data,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Parsed records, or nothing when parsing did not happen.
///
/// `Empty` serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<T> {
    Data(T),
    Empty,
}

impl<T> Payload<T> {
    pub fn as_data(&self) -> Option<&T> {
        match self {
            Payload::Data(data) => Some(data),
            Payload::Empty => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Payload::Data(data) => Some(data),
            Payload::Empty => None,
        }
    }
}

impl<T: Serialize> Serialize for Payload<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Data(data) => data.serialize(serializer),
            Payload::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Ordered records extracted from one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable<R> {
    pub length: usize,
    pub data: Vec<R>,
}

impl<R> ParsedTable<R> {
    pub fn new(data: Vec<R>) -> Self {
        Self {
            length: data.len(),
            data,
        }
    }
}

impl<R> Default for ParsedTable<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Raw response text from the transport.
pub type FetchEnvelope = Envelope<String>;

/// Final answer of a crawler call.
pub type RecordsEnvelope<R> = Envelope<Payload<ParsedTable<R>>>;
