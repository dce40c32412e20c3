//! Timetable (calendar) query and record types.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::query::{ExtraFields, FieldValue, Query, push_text};
use crate::validate::validate_calendar;

/// Filters accepted by the timetable endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarQuery {
    #[serde(rename = "semesterID", skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<String>,

    #[serde(rename = "subjectID", skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    #[serde(rename = "subjectClassID", skip_serializing_if = "Option::is_none")]
    pub subject_class_id: Option<String>,

    #[serde(rename = "subjectName", skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,

    #[serde(rename = "teacherName", skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amphitheater: Option<String>,

    /// `2`..`7` or `CN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,

    #[serde(skip)]
    pub extra: ExtraFields,
}

impl CalendarQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semester(mut self, id: impl Into<String>) -> Self {
        self.semester_id = Some(id.into());
        self
    }

    pub fn subject(mut self, id: impl Into<String>) -> Self {
        self.subject_id = Some(id.into());
        self
    }

    pub fn subject_class(mut self, id: impl Into<String>) -> Self {
        self.subject_class_id = Some(id.into());
        self
    }

    pub fn day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    /// Attach an untyped field; it is sent as-is if the key map knows it.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }
}

impl Query for CalendarQuery {
    fn merged_with(&self, defaults: &Self) -> Self {
        Self {
            semester_id: self.semester_id.clone().or_else(|| defaults.semester_id.clone()),
            subject_id: self.subject_id.clone().or_else(|| defaults.subject_id.clone()),
            subject_class_id: self
                .subject_class_id
                .clone()
                .or_else(|| defaults.subject_class_id.clone()),
            subject_name: self.subject_name.clone().or_else(|| defaults.subject_name.clone()),
            teacher_name: self.teacher_name.clone().or_else(|| defaults.teacher_name.clone()),
            amphitheater: self.amphitheater.clone().or_else(|| defaults.amphitheater.clone()),
            day: self.day.clone().or_else(|| defaults.day.clone()),
            extra: self.extra.clone(),
        }
    }

    fn validated(&self) -> Result<Self, ValidationError> {
        validate_calendar(self)
    }

    fn fields(&self) -> Vec<(String, FieldValue)> {
        let mut out = Vec::new();
        push_text(&mut out, "semesterID", &self.semester_id);
        push_text(&mut out, "subjectID", &self.subject_id);
        push_text(&mut out, "subjectClassID", &self.subject_class_id);
        push_text(&mut out, "subjectName", &self.subject_name);
        push_text(&mut out, "teacherName", &self.teacher_name);
        push_text(&mut out, "amphitheater", &self.amphitheater);
        push_text(&mut out, "day", &self.day);
        out.extend(self.extra.iter().cloned());
        out
    }
}

/// One row of the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRecord {
    pub index: u32,
    #[serde(rename = "courseSubjectID")]
    pub course_subject_id: String,
    pub course_subject_name: String,
    pub course_credits: u32,
    #[serde(rename = "courseSubjectClassID")]
    pub course_subject_class_id: String,
    pub teacher_name: String,
    pub student_count: u32,
    /// Session label as printed, e.g. `Sáng` or `Chiều`
    pub lesson_of_day: String,
    /// Raw day code, `2`..`7` or `CN`
    pub day: String,
    /// Inclusive `[start, end]` period range
    pub lessons: [u32; 2],
    pub amphitheater: String,
    pub course_group: String,
}
