use std::io::Cursor;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::applications::{
    application_router, AdminPin, ApplicationWorkflow, ApplyRequest, Pin, RevokeRequest,
};
use crate::workflows::records::{
    AppliedStatus, CourseApplication, CourseApplicationRecord, CourseFilter, CourseRepository,
    FacultyDirectory, InMemoryCourseStore, RecordId, RepositoryError,
};

pub(super) const ADMIN_PIN: &str = "9090";

pub(super) const COURSES_CSV: &str = "\
Name,Year Semester,Language,Course Title,Time Slot,Day,Time,Frequency,Course format,Reason for Applying,Modified,Applied,Password
Kim,2025-1,Korean,Public Finance,A,Mon,09:00,Weekly,Online,,,,1234
Kim,2025-1,English,Trade Policy,B,Thu,14:00,Weekly,Hybrid,,,,5678
Lee,2025-2,English,Econometrics,C,Tue,13:00,Biweekly,Offline,conference,,YES,0042
";

pub(super) const FACULTY_CSV: &str = "\
국문명,영문명,Category,Email
Kim,Minsu Kim,Full-time,minsu@example.ac.kr
";

pub(super) fn directory() -> Arc<FacultyDirectory> {
    Arc::new(FacultyDirectory::from_reader(Cursor::new(FACULTY_CSV)).expect("faculty fixture"))
}

pub(super) fn admin_pin() -> AdminPin {
    AdminPin::new(Pin::parse(ADMIN_PIN).expect("admin fixture"))
}

pub(super) fn build_workflow() -> (
    ApplicationWorkflow<InMemoryCourseStore>,
    Arc<InMemoryCourseStore>,
) {
    let store = Arc::new(
        InMemoryCourseStore::from_reader(Cursor::new(COURSES_CSV)).expect("course fixture"),
    );
    let workflow = ApplicationWorkflow::new(store.clone(), directory(), admin_pin());
    (workflow, store)
}

pub(super) fn workflow_router() -> (axum::Router, Arc<InMemoryCourseStore>) {
    let (workflow, store) = build_workflow();
    (application_router(Arc::new(workflow)), store)
}

pub(super) fn apply_request(
    name: &str,
    record_id: u64,
    pin: &str,
    reason: Option<&str>,
) -> ApplyRequest {
    ApplyRequest {
        name: name.to_string(),
        record_id: RecordId(record_id),
        pin: pin.to_string(),
        reason: reason.map(str::to_string),
    }
}

pub(super) fn revoke_request(name: &str, record_id: u64, pin: &str) -> RevokeRequest {
    RevokeRequest {
        name: name.to_string(),
        record_id: RecordId(record_id),
        pin: pin.to_string(),
    }
}

pub(super) fn stored(store: &InMemoryCourseStore, record_id: u64) -> CourseApplicationRecord {
    store
        .get(RecordId(record_id))
        .expect("fetch succeeds")
        .expect("record present")
}

pub(super) struct UnavailableRepository;

impl CourseRepository for UnavailableRepository {
    fn append(
        &self,
        _applications: Vec<CourseApplication>,
    ) -> Result<Vec<RecordId>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn get(&self, _id: RecordId) -> Result<Option<CourseApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn find_by_name(&self, _name: &str) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn filter(
        &self,
        _filter: &CourseFilter,
    ) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn all(&self) -> Result<Vec<CourseApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn set_status(
        &self,
        _id: RecordId,
        _status: AppliedStatus,
        _reason: Option<String>,
    ) -> Result<CourseApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
