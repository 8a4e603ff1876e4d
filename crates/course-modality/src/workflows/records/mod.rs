//! In-memory record store for the faculty directory and the course-modality table.
//!
//! Both tables are loaded from CSV once at startup. A source that is missing or fails
//! schema validation leaves the corresponding table empty; callers decide whether that is
//! fatal.

pub mod directory;
pub mod domain;
pub mod export;
pub(crate) mod parser;
pub mod repository;

pub use directory::{EnrichedTable, FacultyDirectory, UploadedTable};
pub use domain::{
    AppliedStatus, CourseApplication, CourseApplicationRecord, CourseField, CourseFilter,
    FacultyRecord, RecordId,
};
pub use export::ExportError;
pub use repository::{CourseRepository, InMemoryCourseStore, RepositoryError};

use std::io::Read;
use std::path::Path;

/// Failure to turn a tabular source into typed records.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

/// Parse course-modality rows without touching any store.
pub fn parse_course_applications<R: Read>(
    reader: R,
) -> Result<Vec<CourseApplication>, LoadError> {
    parser::parse_courses(reader)
}

pub fn read_course_applications<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<CourseApplication>, LoadError> {
    let file = std::fs::File::open(path)?;
    parser::parse_courses(file)
}
