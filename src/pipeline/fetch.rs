// src/pipeline/fetch.rs

//! One-shot fetch runs.

use crate::error::Result;
use crate::models::{
    CalendarQuery, CalendarRecord, Config, EnrollmentQuery, EnrollmentRecord, RecordsEnvelope,
};
use crate::services::{CalendarCrawler, EnrollmentCrawler};

/// Fetch the timetable for `query`.
pub async fn run_calendar(
    config: &Config,
    query: &CalendarQuery,
) -> Result<RecordsEnvelope<CalendarRecord>> {
    let crawler = CalendarCrawler::from_config(config)?;
    log::info!("Fetching timetable from {}", crawler.host());

    let envelope = crawler.get_records(Some(query)).await?;
    log::info!("Timetable: {} {}", envelope.status, envelope.message);
    Ok(envelope)
}

/// Fetch enrollment rows for `query`.
pub async fn run_enrollment(
    config: &Config,
    query: &EnrollmentQuery,
) -> Result<RecordsEnvelope<EnrollmentRecord>> {
    let crawler = EnrollmentCrawler::from_config(config)?;
    log::info!("Fetching enrollment from {}", crawler.host());

    let envelope = crawler.get_records(Some(query)).await?;
    log::info!("Enrollment: {} {}", envelope.status, envelope.message);
    Ok(envelope)
}
