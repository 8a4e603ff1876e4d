//! HTTP surface of the faculty directory: name lookup and e-mail enrichment of uploaded lists.

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
use tracing::info;

use crate::error::AppError;
use crate::workflows::http::csv_attachment;
use crate::workflows::records::{export, FacultyDirectory, UploadedTable};

pub fn faculty_router(directory: Arc<FacultyDirectory>) -> Router {
    Router::new()
        .route("/api/v1/faculty", get(find_handler))
        .route("/api/v1/faculty/search", get(search_handler))
        .route("/api/v1/faculty/enrich", post(enrich_handler))
        .with_state(directory)
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindQuery {
    pub(crate) name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: String,
}

pub(crate) async fn find_handler(
    State(directory): State<Arc<FacultyDirectory>>,
    Query(query): Query<FindQuery>,
) -> Response {
    let records = directory.find(query.name.trim());
    let payload = json!({ "found": !records.is_empty(), "records": records });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn search_handler(
    State(directory): State<Arc<FacultyDirectory>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let records = directory.search(&query.q);
    let payload = json!({ "count": records.len(), "records": records });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn enrich_handler(
    State(directory): State<Arc<FacultyDirectory>>,
    body: Bytes,
) -> Response {
    let upload = match UploadedTable::from_reader(Cursor::new(body)) {
        Ok(upload) => upload,
        Err(error) => return AppError::from(error).into_response(),
    };

    let enriched = directory.enrich(&upload);
    info!(
        rows = enriched.rows.len(),
        matched = enriched.matched,
        "faculty list enriched"
    );

    match export::render(|buffer| export::write_enriched(buffer, &enriched)) {
        Ok(csv) => csv_attachment("faculty_with_email", csv),
        Err(error) => AppError::from(error).into_response(),
    }
}
