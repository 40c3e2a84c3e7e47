//! Route definitions for job execution.

use axum::routing::post;
use axum::Router;

use crate::handlers::automation;
use crate::state::AppState;

/// ```text
/// POST   /run-automation    -> run_automation   (multipart, streams the worker's output)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/run-automation", post(automation::run_automation))
}
