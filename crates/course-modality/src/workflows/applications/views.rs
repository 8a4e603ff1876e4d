use serde::Serialize;

use crate::workflows::records::{CourseApplicationRecord, RecordId};

/// Fields anyone may see without a PIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    pub record_id: RecordId,
    pub applicant_name: String,
    pub year_semester: String,
    pub language: String,
    pub course_title: String,
    pub time_slot: String,
    pub day: String,
    pub time: String,
    pub frequency: String,
    pub course_format: String,
    pub modified: bool,
    pub applied_status: &'static str,
}

impl From<&CourseApplicationRecord> for CourseView {
    fn from(record: &CourseApplicationRecord) -> Self {
        let application = &record.application;
        Self {
            record_id: record.id,
            applicant_name: application.applicant_name.clone(),
            year_semester: application.year_semester.clone(),
            language: application.language.clone(),
            course_title: application.course_title.clone(),
            time_slot: application.time_slot.clone(),
            day: application.day.clone(),
            time: application.time.clone(),
            frequency: application.frequency.clone(),
            course_format: application.course_format.clone(),
            modified: application.modified,
            applied_status: application.applied_status().label(),
        }
    }
}

/// A course row as seen by an applicant. The reason is only present when the supplied PIN
/// authorizes this particular row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub course: CourseView,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_for_applying: Option<String>,
}

impl ApplicationView {
    pub(crate) fn locked(record: &CourseApplicationRecord) -> Self {
        Self {
            course: CourseView::from(record),
            editable: false,
            reason_for_applying: None,
        }
    }

    pub(crate) fn unlocked(record: &CourseApplicationRecord) -> Self {
        Self {
            course: CourseView::from(record),
            editable: true,
            reason_for_applying: record.application.reason_for_applying().map(str::to_string),
        }
    }
}

/// Full row exposed through the admin override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRecordView {
    #[serde(flatten)]
    pub course: CourseView,
    pub reason_for_applying: Option<String>,
    pub password: String,
}

impl From<&CourseApplicationRecord> for AdminRecordView {
    fn from(record: &CourseApplicationRecord) -> Self {
        Self {
            course: CourseView::from(record),
            reason_for_applying: record.application.reason_for_applying().map(str::to_string),
            password: record.application.password().to_string(),
        }
    }
}
