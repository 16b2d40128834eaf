//! Selection history handlers: list, add, clear, score.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{
    CreateHistoryRequest, HistoryEntryResponse, HistoryQuery, MessageResponse,
    UpdateHistoryScoreRequest,
};
use crate::app_state::AppState;
use crate::error::RosterError;

/// `GET /history` — Most recent selections, newest first.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "History",
    summary = "List selection history",
    description = "Returns at most 100 entries ordered by creation time, newest first.",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History entries", body = Vec<HistoryEntryResponse>),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, RosterError> {
    let entries = state.roster_service.history(query.limit).await?;
    let body: Vec<HistoryEntryResponse> = entries
        .into_iter()
        .map(HistoryEntryResponse::from)
        .collect();
    Ok(Json(body))
}

/// `POST /history` — Record a selection.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    post,
    path = "/api/history",
    tag = "History",
    summary = "Add a history entry",
    description = "Records a selection. `mode` defaults to `random`; `score_delta` defaults to 0, and an explicit `null` leaves the entry pending.",
    request_body = CreateHistoryRequest,
    responses(
        (status = 201, description = "History added", body = MessageResponse),
    )
)]
pub async fn add_history(
    State(state): State<AppState>,
    Json(req): Json<CreateHistoryRequest>,
) -> Result<impl IntoResponse, RosterError> {
    state.roster_service.add_history(req.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("History added"))))
}

/// `DELETE /history` — Clear all history.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    delete,
    path = "/api/history",
    tag = "History",
    summary = "Clear history",
    responses(
        (status = 200, description = "History cleared", body = MessageResponse),
    )
)]
pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RosterError> {
    state.roster_service.clear_history().await?;
    Ok(Json(MessageResponse::new("History cleared")))
}

/// `PUT /history/{student_id}` — Score the newest pending entry.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    put,
    path = "/api/history/{student_id}",
    tag = "History",
    summary = "Score latest pending entry",
    description = "Sets `score_delta` on the most recent entry of the student that has none yet. Succeeds without effect when there is no such entry.",
    params(
        ("student_id" = i64, Path, description = "Student id"),
    ),
    request_body = UpdateHistoryScoreRequest,
    responses(
        (status = 200, description = "History updated", body = MessageResponse),
    )
)]
pub async fn update_history_score(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateHistoryScoreRequest>,
) -> Result<impl IntoResponse, RosterError> {
    state
        .roster_service
        .score_history(student_id, req.score_delta)
        .await?;
    Ok(Json(MessageResponse::new("History updated")))
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/history",
            get(list_history).post(add_history).delete(clear_history),
        )
        .route("/history/{student_id}", put(update_history_score))
}
