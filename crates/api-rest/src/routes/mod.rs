//! Route handlers

pub mod health;
pub mod reports;
pub mod speakers;

use axum::{routing::get, Router};

use crate::AppState;

/// Routes served under `/api/v1`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/report/stat/tag", get(reports::tag_stats))
        .route("/report/stat/language", get(reports::language_stats))
        .route("/speaker/stat", get(speakers::speaker_stats))
        .route("/speaker/stat/entries", get(speakers::speaker_entries))
        .route("/speaker/stat/:id", get(speakers::speaker_years))
}
