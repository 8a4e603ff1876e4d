use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::access::{AccessPolicy, AdminPin, Pin, StoredPinPolicy};
use super::views::{AdminRecordView, ApplicationView, CourseView};
use crate::workflows::records::export::{self, ExportError};
use crate::workflows::records::{
    parse_course_applications, AppliedStatus, CourseApplicationRecord, CourseFilter,
    CourseRepository, FacultyDirectory, LoadError, RecordId, RepositoryError,
};

/// Guarded status transitions over the shared course table.
///
/// Each record moves between unapplied and applied. Both directions require a PIN equal to
/// the password stored on that record; the admin PIN only unlocks reads and exports.
pub struct ApplicationWorkflow<R, P = StoredPinPolicy> {
    repository: Arc<R>,
    policy: Arc<P>,
    directory: Arc<FacultyDirectory>,
    admin: AdminPin,
}

/// Request to mark one row as applied.
#[derive(Clone, Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub record_id: RecordId,
    pub pin: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request to clear the applied flag of one row.
#[derive(Clone, Deserialize)]
pub struct RevokeRequest {
    pub name: String,
    pub record_id: RecordId,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    NotFound,
    Found {
        records: Vec<ApplicationView>,
        /// False when the PIN is missing or malformed.
        controls_enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(ApplicationView),
    Revoked(ApplicationView),
    /// Unknown name, foreign row, and wrong PIN all collapse into this outcome.
    NoMatchingRecord,
    /// The PIN was not four characters long; nothing was attempted.
    ControlsDisabled,
}

impl<R> ApplicationWorkflow<R, StoredPinPolicy>
where
    R: CourseRepository + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<FacultyDirectory>, admin: AdminPin) -> Self {
        Self::with_policy(repository, Arc::new(StoredPinPolicy), directory, admin)
    }
}

impl<R, P> ApplicationWorkflow<R, P>
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    pub fn with_policy(
        repository: Arc<R>,
        policy: Arc<P>,
        directory: Arc<FacultyDirectory>,
        admin: AdminPin,
    ) -> Self {
        Self {
            repository,
            policy,
            directory,
            admin,
        }
    }

    pub fn directory(&self) -> &FacultyDirectory {
        &self.directory
    }

    /// Public search view; never exposes reasons or passwords.
    pub fn search(&self, filter: &CourseFilter) -> Result<Vec<CourseView>, WorkflowError> {
        let records = self.repository.filter(filter)?;
        Ok(records.iter().map(CourseView::from).collect())
    }

    pub fn export_search(&self, filter: &CourseFilter) -> Result<String, WorkflowError> {
        let records = self.repository.filter(filter)?;
        Ok(export::render(|buffer| {
            export::write_search_view(buffer, &records, &self.directory)
        })?)
    }

    /// Validate an uploaded table and append it. Nothing is appended if any row fails.
    pub fn upload<U: Read>(&self, reader: U) -> Result<Vec<RecordId>, WorkflowError> {
        let applications = parse_course_applications(reader)?;
        let ids = self.repository.append(applications)?;
        info!(rows = ids.len(), "course upload appended");
        Ok(ids)
    }

    /// Resolve a name to its rows. A well-formed PIN unlocks the rows whose stored password
    /// it matches; the others stay read-only.
    pub fn lookup(&self, name: &str, pin: Option<&str>) -> Result<LookupOutcome, WorkflowError> {
        let records = self.repository.find_by_name(name.trim())?;
        if records.is_empty() {
            return Ok(LookupOutcome::NotFound);
        }

        let pin = pin.and_then(Pin::parse);
        let views = records
            .iter()
            .map(|record| match &pin {
                Some(pin) if self.policy.authorize(record, pin) => {
                    ApplicationView::unlocked(record)
                }
                _ => ApplicationView::locked(record),
            })
            .collect();

        Ok(LookupOutcome::Found {
            records: views,
            controls_enabled: pin.is_some(),
        })
    }

    pub fn apply(&self, request: ApplyRequest) -> Result<TransitionOutcome, WorkflowError> {
        let Some(pin) = Pin::parse(&request.pin) else {
            return Ok(TransitionOutcome::ControlsDisabled);
        };
        let Some(target) = self.authorized_target(&request.name, request.record_id, &pin)? else {
            debug!(record = %request.record_id, "apply rejected: no matching record");
            return Ok(TransitionOutcome::NoMatchingRecord);
        };

        let updated = self
            .repository
            .set_status(target.id, AppliedStatus::Applied, request.reason)?;
        info!(record = %updated.id, "course application marked applied");
        Ok(TransitionOutcome::Applied(ApplicationView::unlocked(&updated)))
    }

    pub fn revoke(&self, request: RevokeRequest) -> Result<TransitionOutcome, WorkflowError> {
        let Some(pin) = Pin::parse(&request.pin) else {
            return Ok(TransitionOutcome::ControlsDisabled);
        };
        let Some(target) = self.authorized_target(&request.name, request.record_id, &pin)? else {
            debug!(record = %request.record_id, "revoke rejected: no matching record");
            return Ok(TransitionOutcome::NoMatchingRecord);
        };

        let updated = self
            .repository
            .set_status(target.id, AppliedStatus::Unapplied, None)?;
        info!(record = %updated.id, "course application revoked");
        Ok(TransitionOutcome::Revoked(ApplicationView::unlocked(&updated)))
    }

    /// Every record with all fields, behind the admin override.
    pub fn admin_records(&self, pin: &str) -> Result<Vec<AdminRecordView>, WorkflowError> {
        self.require_admin(pin)?;
        let records = self.repository.all()?;
        Ok(records.iter().map(AdminRecordView::from).collect())
    }

    /// Full export joined with faculty names, or a single semester when a tag is given.
    pub fn admin_export(
        &self,
        pin: &str,
        year_semester: Option<&str>,
    ) -> Result<String, WorkflowError> {
        self.require_admin(pin)?;

        let csv = match year_semester.filter(|tag| !tag.is_empty()) {
            Some(tag) => {
                let records = self
                    .repository
                    .filter(&CourseFilter::new().year_semester(tag))?;
                export::render(|buffer| export::write_courses(buffer, &records))?
            }
            None => {
                let records = self.repository.all()?;
                export::render(|buffer| {
                    export::write_courses_with_faculty(buffer, &records, &self.directory)
                })?
            }
        };
        Ok(csv)
    }

    fn require_admin(&self, pin: &str) -> Result<(), WorkflowError> {
        if self.admin.grants(pin) {
            Ok(())
        } else {
            warn!("admin override rejected");
            Err(WorkflowError::AdminDenied)
        }
    }

    fn authorized_target(
        &self,
        name: &str,
        record_id: RecordId,
        pin: &Pin,
    ) -> Result<Option<CourseApplicationRecord>, WorkflowError> {
        let candidates = self.repository.find_by_name(name.trim())?;
        Ok(candidates
            .into_iter()
            .find(|record| record.id == record_id && self.policy.authorize(record, pin)))
    }
}

/// Error raised by the application workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("admin PIN rejected")]
    AdminDenied,
}
