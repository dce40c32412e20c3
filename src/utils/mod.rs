//! Utility functions and helpers.

pub mod url;

pub use self::url::{check_host, is_valid_host, query_string, with_query};
