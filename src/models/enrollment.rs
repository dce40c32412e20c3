//! Student enrollment query and record types.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::query::{ExtraFields, FieldValue, Query, push_number, push_text};
use crate::validate::validate_enrollment;

/// Filters accepted by the enrollment (course registration) endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrollmentQuery {
    /// Rows per page, `0..=5000`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(rename = "semesterID", skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<String>,

    #[serde(rename = "studentID", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,

    /// `dd/mm/yyyy`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_date_birth: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_official_class: Option<String>,

    #[serde(rename = "subjectClassID", skip_serializing_if = "Option::is_none")]
    pub subject_class_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_class_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_credit_number: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip)]
    pub extra: ExtraFields,
}

impl EnrollmentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, id: impl Into<String>) -> Self {
        self.student_id = Some(id.into());
        self
    }

    pub fn subject_class(mut self, id: impl Into<String>) -> Self {
        self.subject_class_id = Some(id.into());
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach an untyped field; it is sent as-is if the key map knows it.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }
}

fn or_text(value: &Option<String>, default: &Option<String>) -> Option<String> {
    value.clone().or_else(|| default.clone())
}

impl Query for EnrollmentQuery {
    fn merged_with(&self, d: &Self) -> Self {
        Self {
            limit: self.limit.or(d.limit),
            semester_id: or_text(&self.semester_id, &d.semester_id),
            student_id: or_text(&self.student_id, &d.student_id),
            student_name: or_text(&self.student_name, &d.student_name),
            student_date_birth: or_text(&self.student_date_birth, &d.student_date_birth),
            student_official_class: or_text(&self.student_official_class, &d.student_official_class),
            subject_class_id: or_text(&self.subject_class_id, &d.subject_class_id),
            subject_class_name: or_text(&self.subject_class_name, &d.subject_class_name),
            subject_group: or_text(&self.subject_group, &d.subject_group),
            subject_credit_number: self.subject_credit_number.or(d.subject_credit_number),
            subject_note: or_text(&self.subject_note, &d.subject_note),
            page: self.page.or(d.page),
            extra: self.extra.clone(),
        }
    }

    fn validated(&self) -> Result<Self, ValidationError> {
        validate_enrollment(self)
    }

    fn fields(&self) -> Vec<(String, FieldValue)> {
        let mut out = Vec::new();
        push_number(&mut out, "limit", self.limit);
        push_text(&mut out, "semesterID", &self.semester_id);
        push_text(&mut out, "studentID", &self.student_id);
        push_text(&mut out, "studentName", &self.student_name);
        push_text(&mut out, "studentDateBirth", &self.student_date_birth);
        push_text(&mut out, "studentOfficialClass", &self.student_official_class);
        push_text(&mut out, "subjectClassID", &self.subject_class_id);
        push_text(&mut out, "subjectClassName", &self.subject_class_name);
        push_text(&mut out, "subjectGroup", &self.subject_group);
        push_number(&mut out, "subjectCreditNumber", self.subject_credit_number);
        push_text(&mut out, "subjectNote", &self.subject_note);
        push_number(&mut out, "page", self.page);
        out.extend(self.extra.iter().cloned());
        out
    }
}

/// A row of the enrollment table.
///
/// The row layout of the enrollment page has not been mapped, so no record
/// can be produced yet and the type has no values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnrollmentRecord {}
