//! Roster statistics handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::StatisticsResponse;
use crate::app_state::AppState;
use crate::error::RosterError;

/// `GET /statistics` — Attendance and history counters.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/statistics",
    tag = "Statistics",
    summary = "Roster statistics",
    description = "Student and attendance counts plus scored/pending history totals.",
    responses(
        (status = 200, description = "Counters", body = StatisticsResponse),
    )
)]
pub async fn statistics(State(state): State<AppState>) -> Result<impl IntoResponse, RosterError> {
    let stats = state.roster_service.statistics().await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/statistics", get(statistics))
}
