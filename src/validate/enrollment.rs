//! Validators for the student enrollment query.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldSpec, Validated, anchored, at_least, in_range, non_blank, pattern};
use crate::error::ValidationError;
use crate::models::EnrollmentQuery;

pub const MAX_LIMIT: i64 = 5000;

pub const LIMIT: FieldSpec = FieldSpec {
    name: "limit",
    label: "limit",
    example: "1000",
};
pub const SEMESTER_ID: FieldSpec = FieldSpec {
    name: "semesterID",
    label: "semester ID",
    example: "036",
};
pub const STUDENT_ID: FieldSpec = FieldSpec {
    name: "studentID",
    label: "student ID",
    example: "21020366",
};
pub const STUDENT_NAME: FieldSpec = FieldSpec {
    name: "studentName",
    label: "Student's name",
    example: "Nguyen Van A",
};
pub const STUDENT_DATE_BIRTH: FieldSpec = FieldSpec {
    name: "studentDateBirth",
    label: "date",
    example: "dd/mm/yyyy",
};
pub const STUDENT_OFFICIAL_CLASS: FieldSpec = FieldSpec {
    name: "studentOfficialClass",
    label: "official class",
    example: "QH-2019-I/CQ-M-CLC1",
};
pub const SUBJECT_CLASS_ID: FieldSpec = FieldSpec {
    name: "subjectClassID",
    label: "subject class ID",
    example: "HIS1001 1",
};
pub const SUBJECT_CLASS_NAME: FieldSpec = FieldSpec {
    name: "subjectClassName",
    label: "Subject class's name",
    example: "Mạng máy tính",
};
pub const SUBJECT_GROUP: FieldSpec = FieldSpec {
    name: "subjectGroup",
    label: "subject group",
    example: "1 or CL",
};
pub const SUBJECT_CREDIT_NUMBER: FieldSpec = FieldSpec {
    name: "subjectCreditNumber",
    label: "subject credit number",
    example: "3",
};
pub const PAGE: FieldSpec = FieldSpec {
    name: "page",
    label: "page number",
    example: "1",
};

static SEMESTER_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^\d{3}$"));
static STUDENT_ID_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^\d{8}$"));
// Shape only: 32/13/2002 is accepted
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^\d{2}/\d{2}/\d{4}$"));
static OFFICIAL_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"^QH-20\d{2}-I/CQ-(?:[A-ZÂĂĐÊÔƠƯ]\d?-?)*$"));
static SUBJECT_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^[A-Z]{3}\d{4} \d{1,2}$"));
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| anchored(r"^(?:\d|CL)$"));

pub fn limit(value: Option<i64>) -> Validated<i64> {
    in_range(LIMIT, value, 0, MAX_LIMIT)
}

pub fn semester_id(value: Option<&str>) -> Validated<String> {
    pattern(SEMESTER_ID, &SEMESTER_RE, value)
}

pub fn student_id(value: Option<&str>) -> Validated<String> {
    pattern(STUDENT_ID, &STUDENT_ID_RE, value)
}

pub fn student_name(value: Option<&str>) -> Validated<String> {
    non_blank(STUDENT_NAME, value)
}

pub fn student_date_birth(value: Option<&str>) -> Validated<String> {
    pattern(STUDENT_DATE_BIRTH, &DATE_RE, value)
}

pub fn student_official_class(value: Option<&str>) -> Validated<String> {
    pattern(STUDENT_OFFICIAL_CLASS, &OFFICIAL_CLASS_RE, value)
}

pub fn subject_class_id(value: Option<&str>) -> Validated<String> {
    pattern(SUBJECT_CLASS_ID, &SUBJECT_CLASS_RE, value)
}

pub fn subject_class_name(value: Option<&str>) -> Validated<String> {
    non_blank(SUBJECT_CLASS_NAME, value)
}

pub fn subject_group(value: Option<&str>) -> Validated<String> {
    pattern(SUBJECT_GROUP, &GROUP_RE, value)
}

pub fn subject_credit_number(value: Option<i64>) -> Validated<i64> {
    in_range(SUBJECT_CREDIT_NUMBER, value, 1, 19)
}

/// Free-form note; only trimmed.
pub fn subject_note(value: Option<&str>) -> Validated<String> {
    Ok(value.map(|v| v.trim().to_string()))
}

pub fn page(value: Option<i64>) -> Validated<i64> {
    at_least(PAGE, value, 1)
}

/// Validate every present field, stopping at the first failure.
pub fn validate_enrollment(query: &EnrollmentQuery) -> Result<EnrollmentQuery, ValidationError> {
    Ok(EnrollmentQuery {
        limit: limit(query.limit)?,
        semester_id: semester_id(query.semester_id.as_deref())?,
        student_id: student_id(query.student_id.as_deref())?,
        student_name: student_name(query.student_name.as_deref())?,
        student_date_birth: student_date_birth(query.student_date_birth.as_deref())?,
        student_official_class: student_official_class(query.student_official_class.as_deref())?,
        subject_class_id: subject_class_id(query.subject_class_id.as_deref())?,
        subject_class_name: subject_class_name(query.subject_class_name.as_deref())?,
        subject_group: subject_group(query.subject_group.as_deref())?,
        subject_credit_number: subject_credit_number(query.subject_credit_number)?,
        subject_note: subject_note(query.subject_note.as_deref())?,
        page: page(query.page)?,
        extra: query.extra.clone(),
    })
}
