//! CSV renderings of the in-memory tables.
//!
//! Exports reflect the rows exactly as they are at call time, including status changes made
//! during the current session. A full course export loads back into the same records; the
//! joined faculty columns are ignored on load.

use std::io::Write;

use super::directory::{EnrichedTable, FacultyDirectory};
use super::domain::{CourseApplication, CourseApplicationRecord};

pub const COURSE_COLUMNS: [&str; 13] = [
    "Name",
    "Year Semester",
    "Language",
    "Course Title",
    "Time Slot",
    "Day",
    "Time",
    "Frequency",
    "Course format",
    "Reason for Applying",
    "Modified",
    "Applied",
    "Password",
];

pub const FACULTY_JOIN_COLUMNS: [&str; 2] = ["국문명", "영문명"];

/// Columns safe to show without a PIN.
pub const SEARCH_COLUMNS: [&str; 12] = [
    "Row",
    "Name",
    "Year Semester",
    "Language",
    "Course Title",
    "Time Slot",
    "Day",
    "Time",
    "Frequency",
    "Course format",
    "Modified",
    "Applied",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn flag_label(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        ""
    }
}

fn course_cells(application: &CourseApplication) -> [&str; 13] {
    [
        &application.applicant_name,
        &application.year_semester,
        &application.language,
        &application.course_title,
        &application.time_slot,
        &application.day,
        &application.time,
        &application.frequency,
        &application.course_format,
        application.reason_for_applying().unwrap_or_default(),
        flag_label(application.modified),
        application.applied_status().label(),
        application.password(),
    ]
}

fn joined_names<'a>(
    directory: &'a FacultyDirectory,
    application: &CourseApplication,
) -> (&'a str, &'a str) {
    directory
        .by_korean_name(&application.applicant_name)
        .map_or(("", ""), |faculty| {
            (faculty.korean_name.as_str(), faculty.english_name.as_str())
        })
}

/// Every course column, sensitive ones included.
pub fn write_courses<W: Write>(
    writer: W,
    records: &[CourseApplicationRecord],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COURSE_COLUMNS)?;
    for record in records {
        csv_writer.write_record(course_cells(&record.application))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Every course column plus the Korean/English names joined on `Name == 국문명`.
pub fn write_courses_with_faculty<W: Write>(
    writer: W,
    records: &[CourseApplicationRecord],
    directory: &FacultyDirectory,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COURSE_COLUMNS.iter().chain(FACULTY_JOIN_COLUMNS.iter()))?;
    for record in records {
        let application = &record.application;
        let (korean, english) = joined_names(directory, application);
        csv_writer.write_record(
            course_cells(application)
                .into_iter()
                .chain([korean, english]),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Non-sensitive columns of a filtered view, joined with faculty names like the full export.
pub fn write_search_view<W: Write>(
    writer: W,
    records: &[CourseApplicationRecord],
    directory: &FacultyDirectory,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(SEARCH_COLUMNS.iter().chain(FACULTY_JOIN_COLUMNS.iter()))?;
    for record in records {
        let application = &record.application;
        let row = record.id.0.to_string();
        let (korean, english) = joined_names(directory, application);
        let cells: [&str; 14] = [
            &row,
            &application.applicant_name,
            &application.year_semester,
            &application.language,
            &application.course_title,
            &application.time_slot,
            &application.day,
            &application.time,
            &application.frequency,
            &application.course_format,
            flag_label(application.modified),
            application.applied_status().label(),
            korean,
            english,
        ];
        csv_writer.write_record(cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_enriched<W: Write>(writer: W, table: &EnrichedTable) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render an export into an in-memory string.
pub fn render<F>(write: F) -> Result<String, ExportError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), ExportError>,
{
    let mut buffer = Vec::new();
    write(&mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
