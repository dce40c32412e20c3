//! Validators for the timetable (calendar) query.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldSpec, Validated, anchored, choice, pattern};
use crate::error::ValidationError;
use crate::models::CalendarQuery;

pub const SEMESTER_ID: FieldSpec = FieldSpec {
    name: "semesterID",
    label: "semester ID",
    example: "78",
};
pub const SUBJECT_ID: FieldSpec = FieldSpec {
    name: "subjectID",
    label: "subject ID",
    example: "1234",
};
pub const SUBJECT_CLASS_ID: FieldSpec = FieldSpec {
    name: "subjectClassID",
    label: "subject class ID",
    example: "1234",
};
pub const SUBJECT_NAME: FieldSpec = FieldSpec {
    name: "subjectName",
    label: "subject's name",
    example: "1234",
};
pub const TEACHER_NAME: FieldSpec = FieldSpec {
    name: "teacherName",
    label: "teacher's name",
    example: "1234",
};
pub const AMPHITHEATER: FieldSpec = FieldSpec {
    name: "amphitheater",
    label: "amphitheater",
    example: "1234",
};
pub const DAY: FieldSpec = FieldSpec {
    name: "day",
    label: "day",
    example: "CN",
};

static SEMESTER_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^\d{2,3}$"));
// The filter drop-downs on the timetable page post 4-digit option codes
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^\d{4}$"));
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^(?:[2-7]|CN)$"));

pub fn semester_id(value: Option<&str>) -> Validated<String> {
    pattern(SEMESTER_ID, &SEMESTER_RE, value)
}

pub fn subject_id(value: Option<&str>) -> Validated<String> {
    pattern(SUBJECT_ID, &CODE_RE, value)
}

pub fn subject_class_id(value: Option<&str>) -> Validated<String> {
    pattern(SUBJECT_CLASS_ID, &CODE_RE, value)
}

pub fn subject_name(value: Option<&str>) -> Validated<String> {
    pattern(SUBJECT_NAME, &CODE_RE, value)
}

pub fn teacher_name(value: Option<&str>) -> Validated<String> {
    pattern(TEACHER_NAME, &CODE_RE, value)
}

pub fn amphitheater(value: Option<&str>) -> Validated<String> {
    pattern(AMPHITHEATER, &CODE_RE, value)
}

/// Weekday `2`..`7`, or `CN` for Sunday.
pub fn day(value: Option<&str>) -> Validated<String> {
    choice(DAY, &DAY_RE, value)
}

/// Validate every present field, stopping at the first failure.
pub fn validate_calendar(query: &CalendarQuery) -> Result<CalendarQuery, ValidationError> {
    Ok(CalendarQuery {
        semester_id: semester_id(query.semester_id.as_deref())?,
        subject_id: subject_id(query.subject_id.as_deref())?,
        subject_class_id: subject_class_id(query.subject_class_id.as_deref())?,
        subject_name: subject_name(query.subject_name.as_deref())?,
        teacher_name: teacher_name(query.teacher_name.as_deref())?,
        amphitheater: amphitheater(query.amphitheater.as_deref())?,
        day: day(query.day.as_deref())?,
        extra: query.extra.clone(),
    })
}
