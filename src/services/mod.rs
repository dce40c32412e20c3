//! Service layer for the crawler.
//!
//! - Crawler composition (`Crawler`, `CalendarCrawler`, `EnrollmentCrawler`)
//! - Table parsing (`CalendarParser`, `EnrollmentParser`)
//! - HTTP transport (`HttpTransport`)

pub mod crawler;
pub mod parser;
pub mod transport;

pub use crawler::{CalendarCrawler, Crawler, EnrollmentCrawler, parse_response};
pub use parser::{CalendarParser, EnrollmentParser, TableParser};
pub use transport::{HttpTransport, Method, Transport};
