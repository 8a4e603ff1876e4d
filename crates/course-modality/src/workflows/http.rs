use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// CSV download with a sanitized attachment file name.
pub(crate) fn csv_attachment(file_stem: &str, body: String) -> Response {
    let stem: String = file_stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    let disposition = format!("attachment; filename=\"{stem}.csv\"");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_name_drops_unsafe_characters() {
        let response = csv_attachment("course_modality_2025-1\"; x=\u{d55c}", String::new());
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .expect("ascii disposition");
        assert_eq!(
            disposition,
            "attachment; filename=\"course_modality_2025-1x.csv\""
        );
    }
}
