use std::io::Read;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use super::domain::{
    AppliedStatus, CourseApplication, CourseApplicationRecord, CourseField, CourseFilter,
    RecordId,
};
use super::{parser, LoadError};

/// Storage abstraction so the workflow can be exercised in isolation.
///
/// The applied status and its reason are the only mutable fields; everything else is fixed
/// once a row has been appended.
pub trait CourseRepository: Send + Sync {
    /// Append rows in order, without deduplication, returning the ids assigned to them.
    fn append(
        &self,
        applications: Vec<CourseApplication>,
    ) -> Result<Vec<RecordId>, RepositoryError>;
    fn get(&self, id: RecordId) -> Result<Option<CourseApplicationRecord>, RepositoryError>;
    /// Exact match on the applicant name, in insertion order.
    fn find_by_name(&self, name: &str) -> Result<Vec<CourseApplicationRecord>, RepositoryError>;
    fn filter(&self, filter: &CourseFilter)
        -> Result<Vec<CourseApplicationRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<CourseApplicationRecord>, RepositoryError>;
    fn set_status(
        &self,
        id: RecordId,
        status: AppliedStatus,
        reason: Option<String>,
    ) -> Result<CourseApplicationRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-wide course table shared by every handler. Writes are last-write-wins.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCourseStore {
    table: Arc<RwLock<CourseTable>>,
}

#[derive(Debug, Default)]
struct CourseTable {
    rows: Vec<CourseApplicationRecord>,
    last_id: u64,
}

impl CourseTable {
    fn push(&mut self, application: CourseApplication) -> RecordId {
        self.last_id += 1;
        let id = RecordId(self.last_id);
        self.rows.push(CourseApplicationRecord { id, application });
        id
    }
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(applications: Vec<CourseApplication>) -> Self {
        let mut table = CourseTable::default();
        for application in applications {
            table.push(application);
        }
        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let applications = parser::parse_courses(reader)?;
        Ok(Self::with_applications(applications))
    }

    /// Load the startup source, falling back to an empty store when it cannot be used.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(store) => {
                info!(path = %path.display(), rows = store.len(), "course table loaded");
                store
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "course table unavailable; starting with an empty store"
                );
                Self::new()
            }
        }
    }

    pub fn filter_contains(
        &self,
        field: CourseField,
        substring: &str,
    ) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        self.filter(&CourseFilter::new().contains(field, substring))
    }

    pub fn len(&self) -> usize {
        self.read().map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CourseTable>, RepositoryError> {
        self.table
            .read()
            .map_err(|_| RepositoryError::Unavailable("course table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CourseTable>, RepositoryError> {
        self.table
            .write()
            .map_err(|_| RepositoryError::Unavailable("course table lock poisoned".to_string()))
    }
}

impl CourseRepository for InMemoryCourseStore {
    fn append(
        &self,
        applications: Vec<CourseApplication>,
    ) -> Result<Vec<RecordId>, RepositoryError> {
        let mut table = self.write()?;
        Ok(applications
            .into_iter()
            .map(|application| table.push(application))
            .collect())
    }

    fn get(&self, id: RecordId) -> Result<Option<CourseApplicationRecord>, RepositoryError> {
        let table = self.read()?;
        Ok(table.rows.iter().find(|record| record.id == id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        let table = self.read()?;
        Ok(table
            .rows
            .iter()
            .filter(|record| record.application.applicant_name == name)
            .cloned()
            .collect())
    }

    fn filter(
        &self,
        filter: &CourseFilter,
    ) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        let table = self.read()?;
        Ok(table
            .rows
            .iter()
            .filter(|record| filter.matches(&record.application))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        Ok(self.read()?.rows.clone())
    }

    fn set_status(
        &self,
        id: RecordId,
        status: AppliedStatus,
        reason: Option<String>,
    ) -> Result<CourseApplicationRecord, RepositoryError> {
        let mut table = self.write()?;
        let record = table
            .rows
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.application.set_applied(status, reason);
        Ok(record.clone())
    }
}
