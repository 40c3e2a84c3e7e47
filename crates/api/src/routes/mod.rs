pub mod automation;
pub mod health;
pub mod template;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /run-automation      POST  multipart (website, file, [keep_open]) -> streamed text/plain
/// /download-template   GET   spreadsheet template attachment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(automation::router())
        .merge(template::router())
}
