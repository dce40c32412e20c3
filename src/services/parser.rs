//! Table parsers.
//!
//! The endpoints answer with an HTML fragment holding a single `<table>`.
//! Rows are picked out with regular expressions rather than a DOM so the
//! extraction follows the page's exact markup. Parsing is all-or-nothing:
//! one bad row rejects the whole table.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::models::{CalendarRecord, EnrollmentRecord, ParsedTable};
use crate::validate::parse_lessons;

/// Turns a raw response body into records.
pub trait TableParser: Send + Sync {
    type Record;

    fn parse(&self, text: &str) -> Result<ParsedTable<Self::Record>, ParseError>;
}

// `<tr>` immediately followed by `<td>` cells, across lines
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<tr>(?:<td.*?</td>)*</tr>").expect("row pattern must compile")
});
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td.*?td>").expect("cell pattern must compile"));
static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)>(.*?)<").expect("text pattern must compile"));

/// Header rows at the top of every listing.
const HEADER_ROWS: usize = 2;

/// Split a fragment into rows of cell texts, skipping the header rows.
///
/// A cell's text is whatever sits between its first `>` and the next `<`.
pub fn extract_rows(text: &str) -> Result<Vec<Vec<&str>>, ParseError> {
    ROW_RE
        .find_iter(text)
        .skip(HEADER_ROWS)
        .enumerate()
        .map(|(row, m)| {
            CELL_RE
                .find_iter(m.as_str())
                .enumerate()
                .map(|(cell, c)| {
                    TEXT_RE
                        .captures(c.as_str())
                        .and_then(|caps| caps.get(1))
                        .map(|t| t.as_str())
                        .ok_or(ParseError::MalformedCell { row, cell })
                })
                .collect()
        })
        .collect()
}

/// Parser for the timetable listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarParser;

impl CalendarParser {
    pub const FIELD_COUNT: usize = 12;

    fn record(row: usize, cells: &[&str]) -> Result<CalendarRecord, ParseError> {
        let &[
            index,
            subject_id,
            subject_name,
            credits,
            class_id,
            teacher,
            students,
            session,
            day,
            lessons,
            room,
            group,
        ] = cells
        else {
            return Err(ParseError::FieldCount {
                row,
                expected: Self::FIELD_COUNT,
                found: cells.len(),
            });
        };

        Ok(CalendarRecord {
            index: number(row, "index", index)?,
            course_subject_id: subject_id.to_string(),
            course_subject_name: subject_name.to_string(),
            course_credits: number(row, "courseCredits", credits)?,
            course_subject_class_id: class_id.to_string(),
            teacher_name: teacher.to_string(),
            student_count: number(row, "studentCount", students)?,
            lesson_of_day: session.to_string(),
            day: day.to_string(),
            lessons: parse_lessons(lessons).map_err(|source| ParseError::Lesson { row, source })?,
            amphitheater: room.to_string(),
            course_group: group.to_string(),
        })
    }
}

impl TableParser for CalendarParser {
    type Record = CalendarRecord;

    fn parse(&self, text: &str) -> Result<ParsedTable<CalendarRecord>, ParseError> {
        let records = extract_rows(text)?
            .iter()
            .enumerate()
            .map(|(row, cells)| Self::record(row, cells))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Parsed {} timetable rows", records.len());
        Ok(ParsedTable::new(records))
    }
}

/// Numeric cell; blank reads as zero.
fn number(row: usize, field: &'static str, raw: &str) -> Result<u32, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| ParseError::Number {
        row,
        field,
        value: raw.to_string(),
    })
}

/// Parser for the enrollment grid.
///
/// The grid's column layout is not mapped yet, so this always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollmentParser;

impl TableParser for EnrollmentParser {
    type Record = EnrollmentRecord;

    fn parse(&self, _text: &str) -> Result<ParsedTable<EnrollmentRecord>, ParseError> {
        Err(ParseError::NotImplemented { table: "enrollment" })
    }
}
