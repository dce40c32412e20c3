// src/models/mod.rs

//! Domain models for the crawler.
//!
//! Queries and records for each endpoint, the key map that renames query
//! fields for the wire, the response envelope, and configuration.

mod calendar;
mod config;
mod enrollment;
mod envelope;
mod key_map;
mod query;

pub use calendar::{CalendarQuery, CalendarRecord};
pub use config::{Config, Endpoint, EndpointConfig, HttpConfig};
pub use enrollment::{EnrollmentQuery, EnrollmentRecord};
pub use envelope::{
    Envelope, FetchEnvelope, ParsedTable, Payload, RecordsEnvelope, STATUS_OK,
    STATUS_PARSE_FAILED, STATUS_TRANSPORT_FAILED,
};
pub use key_map::{KeyMap, RESERVED_FIELDS, WireParams};
pub use query::{ExtraFields, FieldValue, Query};
