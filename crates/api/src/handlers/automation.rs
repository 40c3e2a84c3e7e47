//! Handler for job execution.
//!
//! Accepts a multipart form (website profile + spreadsheet upload),
//! stages the upload, launches the automation worker, and answers with
//! a chunked `text/plain` body fed live by the output pipeline. The
//! response is committed as soon as the worker has spawned; everything
//! that goes wrong after that point is reported inside the stream.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use entryflow_core::error::CoreError;
use entryflow_core::pipeline;
use entryflow_core::staging;
use entryflow_core::stream::StreamSink;
use entryflow_core::website::Website;
use entryflow_core::worker::{self, LaunchMode};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Channel capacity between the pipeline and the response body. Small:
/// a slow client should back-pressure the pumps, not grow a buffer.
const SINK_CAPACITY: usize = 64;

/// POST /api/run-automation
///
/// Multipart fields: `website` (profile id), `file` (spreadsheet),
/// optional `keep_open` overriding the configured hand-off default.
pub async fn run_automation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut website: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;
    let mut keep_open: Option<bool> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "website" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                website = Some(value);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .unwrap_or(staging::DEFAULT_STAGED_NAME)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes));
            }
            "keep_open" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = value.parse().map_err(|_| {
                    AppError::BadRequest("keep_open must be true or false".to_string())
                })?;
                keep_open = Some(parsed);
            }
            _ => {}
        }
    }

    // Both fields are required; reject before anything touches disk.
    let (Some(website_id), Some((filename, bytes))) = (website, file) else {
        return Err(AppError::Core(CoreError::Validation(
            "웹사이트와 파일이 필요합니다.".to_string(),
        )));
    };

    let website = Website::from_id(&website_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "지원하지 않는 웹사이트입니다: {website_id}"
        )))
    })?;

    let mode = if keep_open.unwrap_or(state.config.keep_browser_open) {
        LaunchMode::HandOff
    } else {
        LaunchMode::AutoClose
    };

    let job_id = Uuid::new_v4();
    tracing::info!(%job_id, website = website.id(), file = %filename, "Job submitted");

    let staged = staging::stage(&state.config.staging_dir, job_id, &filename, &bytes).await?;

    let handle = match worker::launch(&state.config.worker, website, staged.path(), mode) {
        Ok(handle) => handle,
        Err(e) => {
            // Spawn happens before the response commits to streaming,
            // so a launch failure is a plain 500. Clean up here; the
            // pipeline never ran and never will.
            staged.unstage().await;
            return Err(e.into());
        }
    };

    let (sink, rx) = StreamSink::channel(SINK_CAPACITY);
    pipeline::spawn(handle, staged, sink);

    let stream = ReceiverStream::new(rx).map(Ok::<_, std::convert::Infallible>);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .unwrap())
}
