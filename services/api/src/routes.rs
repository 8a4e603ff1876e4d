use crate::infra::{AppState, Datasets};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use course_modality::workflows::applications::application_router;
use course_modality::workflows::faculty::faculty_router;
use serde_json::json;

pub(crate) fn with_service_routes(datasets: &Datasets) -> axum::Router {
    application_router(datasets.workflow.clone())
        .merge(faculty_router(datasets.directory.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{admin_pin, assemble};
    use axum::body::Body;
    use axum::http::Request;
    use course_modality::workflows::records::{FacultyDirectory, InMemoryCourseStore};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::io::Cursor;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const COURSES: &str = "\
Name,Year Semester,Language,Course Title,Time Slot,Day,Time,Frequency,Course format,Reason for Applying,Modified,Applied,Password
Kim,2025-1,Korean,Public Finance,A,Mon,09:00,Weekly,Online,,,,1234
";

    fn app(ready: bool) -> axum::Router {
        let directory = Arc::new(
            FacultyDirectory::from_reader(Cursor::new(
                "국문명,영문명,Category,Email\nKim,Minsu Kim,Full-time,minsu@example.ac.kr\n",
            ))
            .expect("directory parses"),
        );
        let store =
            Arc::new(InMemoryCourseStore::from_reader(Cursor::new(COURSES)).expect("store parses"));
        let datasets = assemble(directory, store, admin_pin("9090").expect("admin pin"));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(&datasets).layer(Extension(state))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_router_serves_both_tables() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/faculty?name=Kim")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        let payload = read_json(response).await;
        assert_eq!(payload["records"][0]["Email"], "minsu@example.ac.kr");

        let response = app(true)
            .oneshot(
                Request::get("/api/v1/courses?name=Kim")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        let payload = read_json(response).await;
        assert_eq!(payload["count"], 1);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
