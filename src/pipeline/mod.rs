//! Pipeline entry points for crawler operations.
//!
//! - `run_calendar`: Fetch and parse the timetable listing
//! - `run_enrollment`: Fetch and parse the enrollment grid
//! - `run_validate`: Check the configuration before any request is made

pub mod fetch;
pub mod validate;

pub use fetch::{run_calendar, run_enrollment};
pub use validate::{EndpointSummary, run_validate};
