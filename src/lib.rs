// src/lib.rs

//! Timetable Crawler Library
//!
//! Validated queries in, typed timetable records out:
//! validation, key mapping, one HTTP call, regex table extraction.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
pub mod validate;
