//! Route definition for the spreadsheet template download.

use axum::routing::get;
use axum::Router;

use crate::handlers::template;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/download-template", get(template::download_template))
}
