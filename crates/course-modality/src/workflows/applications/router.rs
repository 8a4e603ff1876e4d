use std::io::Cursor;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::access::{AccessPolicy, PIN_LENGTH};
use super::service::{
    ApplicationWorkflow, ApplyRequest, LookupOutcome, RevokeRequest, TransitionOutcome,
    WorkflowError,
};
use crate::error::AppError;
use crate::workflows::http::csv_attachment;
use crate::workflows::records::{CourseField, CourseFilter, CourseRepository};

const NO_MATCH_MESSAGE: &str = "no entry matches the supplied name and PIN";

/// Router exposing course search, uploads, the guarded status workflow, and admin exports.
pub fn application_router<R, P>(workflow: Arc<ApplicationWorkflow<R, P>>) -> Router
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    Router::new()
        .route("/api/v1/courses", get(search_handler::<R, P>))
        .route("/api/v1/courses/export", get(search_export_handler::<R, P>))
        .route("/api/v1/courses/upload", post(upload_handler::<R, P>))
        .route(
            "/api/v1/applications/lookup",
            post(lookup_handler::<R, P>),
        )
        .route("/api/v1/applications/apply", post(apply_handler::<R, P>))
        .route("/api/v1/applications/revoke", post(revoke_handler::<R, P>))
        .route("/api/v1/admin/records", post(admin_records_handler::<R, P>))
        .route("/api/v1/admin/export", post(admin_export_handler::<R, P>))
        .with_state(workflow)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CourseSearchQuery {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) format: Option<String>,
}

impl CourseSearchQuery {
    fn filter(&self) -> CourseFilter {
        CourseFilter::new()
            .contains(
                CourseField::ApplicantName,
                self.name.clone().unwrap_or_default(),
            )
            .contains(
                CourseField::CourseFormat,
                self.format.clone().unwrap_or_default(),
            )
    }
}

#[derive(Deserialize)]
pub(crate) struct LookupRequest {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) pin: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct AdminRequest {
    pub(crate) pin: String,
    #[serde(default)]
    pub(crate) year_semester: Option<String>,
}

pub(crate) async fn search_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Query(query): Query<CourseSearchQuery>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.search(&query.filter()) {
        Ok(records) => {
            let payload = json!({ "count": records.len(), "records": records });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn search_export_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Query(query): Query<CourseSearchQuery>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.export_search(&query.filter()) {
        Ok(csv) => csv_attachment("course_modality_search", csv),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn upload_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    body: Bytes,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.upload(Cursor::new(body)) {
        Ok(ids) => {
            let payload = json!({ "appended": ids.len(), "record_ids": ids });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn lookup_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Json(request): Json<LookupRequest>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.lookup(&request.name, request.pin.as_deref()) {
        Ok(LookupOutcome::NotFound) => {
            let payload = json!({
                "found": false,
                "controls_enabled": false,
                "records": [],
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(LookupOutcome::Found {
            records,
            controls_enabled,
        }) => {
            let payload = json!({
                "found": true,
                "controls_enabled": controls_enabled,
                "records": records,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn apply_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.apply(request) {
        Ok(outcome) => transition_response(outcome),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn revoke_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Json(request): Json<RevokeRequest>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.revoke(request) {
        Ok(outcome) => transition_response(outcome),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn admin_records_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Json(request): Json<AdminRequest>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    match workflow.admin_records(&request.pin) {
        Ok(records) => {
            let payload = json!({ "count": records.len(), "records": records });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn admin_export_handler<R, P>(
    State(workflow): State<Arc<ApplicationWorkflow<R, P>>>,
    Json(request): Json<AdminRequest>,
) -> Response
where
    R: CourseRepository + 'static,
    P: AccessPolicy + 'static,
{
    let semester = request
        .year_semester
        .as_deref()
        .filter(|tag| !tag.is_empty());
    match workflow.admin_export(&request.pin, semester) {
        Ok(csv) => {
            let stem = match semester {
                Some(tag) => format!("course_modality_{tag}"),
                None => "course_modality_full".to_string(),
            };
            csv_attachment(&stem, csv)
        }
        Err(error) => workflow_error_response(error),
    }
}

fn transition_response(outcome: TransitionOutcome) -> Response {
    match outcome {
        TransitionOutcome::Applied(record) => {
            let payload = json!({ "outcome": "applied", "record": record });
            (StatusCode::OK, Json(payload)).into_response()
        }
        TransitionOutcome::Revoked(record) => {
            let payload = json!({ "outcome": "revoked", "record": record });
            (StatusCode::OK, Json(payload)).into_response()
        }
        TransitionOutcome::NoMatchingRecord => {
            let payload = json!({
                "outcome": "no_matching_record",
                "error": NO_MATCH_MESSAGE,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        TransitionOutcome::ControlsDisabled => {
            let payload = json!({
                "outcome": "controls_disabled",
                "message": format!("enter the {PIN_LENGTH}-character PIN to change this entry"),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
    }
}

fn workflow_error_response(error: WorkflowError) -> Response {
    AppError::from(error).into_response()
}
