use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{AppliedStatus, CourseApplication, FacultyRecord};
use super::LoadError;

/// Header name plus the alternative spellings accepted on input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub(crate) name: &'static str,
    pub(crate) aliases: &'static [&'static str],
}

impl Column {
    const fn new(name: &'static str) -> Self {
        Self { name, aliases: &[] }
    }

    const fn with_aliases(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    pub(crate) fn position(&self, headers: &csv::StringRecord) -> Option<usize> {
        headers
            .iter()
            .position(|header| header == self.name || self.aliases.contains(&header))
    }
}

pub(crate) const KOREAN_NAME: Column = Column::with_aliases("국문명", &["Korean Name"]);
pub(crate) const ENGLISH_NAME: Column = Column::with_aliases("영문명", &["English Name"]);

const FACULTY_REQUIRED: [Column; 2] = [KOREAN_NAME, ENGLISH_NAME];

const COURSE_REQUIRED: [Column; 10] = [
    Column::new("Name"),
    Column::new("Year Semester"),
    Column::new("Language"),
    Column::new("Course Title"),
    Column::new("Time Slot"),
    Column::new("Day"),
    Column::new("Time"),
    Column::new("Frequency"),
    Column::with_aliases("Course format", &["Course Format"]),
    Column::new("Password"),
];

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

pub(crate) fn require_columns(
    headers: &csv::StringRecord,
    required: &[Column],
) -> Result<(), LoadError> {
    match required
        .iter()
        .find(|column| column.position(headers).is_none())
    {
        Some(column) => Err(LoadError::MissingColumn {
            column: column.name,
        }),
        None => Ok(()),
    }
}

pub(crate) fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

pub(crate) fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}

pub(crate) fn parse_courses<R: Read>(reader: R) -> Result<Vec<CourseApplication>, LoadError> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &COURSE_REQUIRED)?;

    let mut applications = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let line = line_of(&record);
        let row: CourseRow = record.deserialize(Some(&headers))?;
        applications.push(row.into_application(line)?);
    }

    Ok(applications)
}

pub(crate) fn parse_faculty<R: Read>(reader: R) -> Result<Vec<FacultyRecord>, LoadError> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, &FACULTY_REQUIRED)?;

    let mut seen = HashSet::new();
    let mut faculty = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let line = line_of(&record);
        let entry: FacultyRecord = record.deserialize(Some(&headers))?;
        if entry.korean_name.is_empty() {
            return Err(LoadError::InvalidRow {
                line,
                reason: "missing 국문명".to_string(),
            });
        }
        if !seen.insert(entry.korean_name.clone()) {
            return Err(LoadError::InvalidRow {
                line,
                reason: format!("duplicate 국문명 '{}'", entry.korean_name),
            });
        }
        faculty.push(entry);
    }

    Ok(faculty)
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Year Semester")]
    year_semester: String,
    #[serde(rename = "Language")]
    language: String,
    #[serde(rename = "Course Title")]
    course_title: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
    #[serde(rename = "Day")]
    day: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "Course format", alias = "Course Format")]
    course_format: String,
    #[serde(
        rename = "Reason for Applying",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    reason_for_applying: Option<String>,
    #[serde(rename = "Modified", default, deserialize_with = "empty_string_as_none")]
    modified: Option<String>,
    #[serde(rename = "Applied", default, deserialize_with = "empty_string_as_none")]
    applied: Option<String>,
    #[serde(rename = "Password")]
    password: String,
}

impl CourseRow {
    fn into_application(self, line: u64) -> Result<CourseApplication, LoadError> {
        if self.name.is_empty() {
            return Err(LoadError::InvalidRow {
                line,
                reason: "missing Name".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(LoadError::InvalidRow {
                line,
                reason: "missing Password".to_string(),
            });
        }

        let raw_applied = self.applied.unwrap_or_default();
        let status = AppliedStatus::parse(&raw_applied).ok_or_else(|| LoadError::InvalidRow {
            line,
            reason: format!("Applied must be empty or YES, found '{raw_applied}'"),
        })?;

        let mut application = CourseApplication::new(self.name, self.password)
            .with_applied(status, self.reason_for_applying);
        application.year_semester = self.year_semester;
        application.language = self.language;
        application.course_title = self.course_title;
        application.time_slot = self.time_slot;
        application.day = self.day;
        application.time = self.time;
        application.frequency = self.frequency;
        application.course_format = self.course_format;
        application.modified = self.modified.as_deref().is_some_and(parse_flag);

        Ok(application)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_uppercase().as_str(),
        "YES" | "Y" | "TRUE" | "1" | "O"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
