//! Spin handler: draw a present student.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SpinRequest, StudentResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RosterError};

/// `POST /spin` — Draw one present student.
///
/// # Errors
///
/// Returns [`RosterError::NoActiveStudents`] if nobody is present and
/// [`RosterError::UnknownMode`] for an unrecognized mode.
#[utoipa::path(
    post,
    path = "/api/spin",
    tag = "Spin",
    summary = "Spin the wheel",
    description = "Draws a present student uniformly (`random`, `rollCall`) or among the least selected (`fair`) and increments their selection count. The body is the record as read before the increment.",
    request_body = SpinRequest,
    responses(
        (status = 200, description = "Selected student", body = StudentResponse),
        (status = 400, description = "No active students or unknown mode", body = ErrorResponse),
    )
)]
pub async fn spin(
    State(state): State<AppState>,
    Json(req): Json<SpinRequest>,
) -> Result<impl IntoResponse, RosterError> {
    let selected = state
        .roster_service
        .spin(req.mode_or_default(), req.avoid_repeat)
        .await?;
    Ok(Json(StudentResponse::from(selected)))
}

/// Spin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/spin", post(spin))
}
