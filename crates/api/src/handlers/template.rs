//! Handler for the spreadsheet template download.
//!
//! Serves the fixed xlsx template users fill in before submitting a
//! job. The asset lives in the automation project tree, not in this
//! repo.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Content type for `.xlsx` workbooks.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /api/download-template
pub async fn download_template(State(state): State<AppState>) -> AppResult<Response> {
    let path = &state.config.template_path;

    let data = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Template file unavailable");
        AppError::NotFound("템플릿 파일을 찾을 수 없습니다.".to_string())
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("template.xlsx");

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .body(Body::from(data))
        .unwrap())
}
