use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable row identity assigned by the course store in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{:06}", self.0)
    }
}

/// Binary applied flag. The tabular form is either empty or exactly `YES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppliedStatus {
    #[default]
    Unapplied,
    Applied,
}

impl AppliedStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppliedStatus::Unapplied => "",
            AppliedStatus::Applied => "YES",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => Some(AppliedStatus::Unapplied),
            "YES" => Some(AppliedStatus::Applied),
            _ => None,
        }
    }
}

/// Faculty directory entry; the Korean name is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    #[serde(rename = "국문명", alias = "Korean Name")]
    pub korean_name: String,
    #[serde(rename = "영문명", alias = "English Name")]
    pub english_name: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Email", default)]
    pub email: String,
}

/// One course-modality request as loaded from the source table.
///
/// The password is fixed when the entry is created; only the applied status and the
/// reason change afterwards, and only through the course store's status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseApplication {
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
    pub(crate) reason_for_applying: Option<String>,
    pub(crate) applied_status: AppliedStatus,
    pub(crate) password: String,
}

impl CourseApplication {
    pub fn new(applicant_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            year_semester: String::new(),
            language: String::new(),
            course_title: String::new(),
            time_slot: String::new(),
            day: String::new(),
            time: String::new(),
            frequency: String::new(),
            course_format: String::new(),
            modified: false,
            reason_for_applying: None,
            applied_status: AppliedStatus::Unapplied,
            password: password.into(),
        }
    }

    /// Seeds the applied state for entries that arrive already applied (e.g. a re-imported
    /// export). A reason without the applied flag is dropped.
    pub fn with_applied(mut self, status: AppliedStatus, reason: Option<String>) -> Self {
        self.set_applied(status, reason);
        self
    }

    pub(crate) fn set_applied(&mut self, status: AppliedStatus, reason: Option<String>) {
        self.applied_status = status;
        self.reason_for_applying = match status {
            AppliedStatus::Applied => reason
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            AppliedStatus::Unapplied => None,
        };
    }

    pub fn applied_status(&self) -> AppliedStatus {
        self.applied_status
    }

    pub fn reason_for_applying(&self) -> Option<&str> {
        self.reason_for_applying.as_deref()
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Stored course entry: the loaded data plus the identity the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseApplicationRecord {
    pub id: RecordId,
    pub application: CourseApplication,
}

impl CourseApplicationRecord {
    pub fn applied_status(&self) -> AppliedStatus {
        self.application.applied_status
    }

    pub fn is_applied(&self) -> bool {
        self.application.applied_status == AppliedStatus::Applied
    }
}

/// Columns usable with substring filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    ApplicantName,
    YearSemester,
    CourseTitle,
    CourseFormat,
}

impl CourseField {
    pub fn value(self, application: &CourseApplication) -> &str {
        match self {
            CourseField::ApplicantName => &application.applicant_name,
            CourseField::YearSemester => &application.year_semester,
            CourseField::CourseTitle => &application.course_title,
            CourseField::CourseFormat => &application.course_format,
        }
    }
}

/// Conjunctive filter over course entries. Empty substrings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    contains: Vec<(CourseField, String)>,
    year_semester: Option<String>,
}

impl CourseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, field: CourseField, substring: impl Into<String>) -> Self {
        let substring = substring.into();
        if !substring.is_empty() {
            self.contains.push((field, substring));
        }
        self
    }

    /// Exact match on the semester tag, e.g. `2025-1`.
    pub fn year_semester(mut self, tag: impl Into<String>) -> Self {
        self.year_semester = Some(tag.into());
        self
    }

    pub fn matches(&self, application: &CourseApplication) -> bool {
        let semester_ok = self
            .year_semester
            .as_deref()
            .map_or(true, |tag| application.year_semester == tag);

        semester_ok
            && self
                .contains
                .iter()
                .all(|(field, substring)| field.value(application).contains(substring.as_str()))
    }
}
