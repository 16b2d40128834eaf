//! Student handlers: list, add, batch add, import, delete, status, score,
//! edit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use crate::api::dto::{
    BatchAddRequest, BatchAddResponse, CreateStudentRequest, ImportStudentsRequest,
    MessageResponse, StudentResponse, UpdateScoreRequest, UpdateStatusRequest, UpdateStudentRequest,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RosterError};

/// `GET /students` — List all students.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    summary = "List students",
    description = "Returns every student in storage order.",
    responses(
        (status = 200, description = "All students", body = Vec<StudentResponse>),
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RosterError> {
    let students = state.roster_service.list_students().await?;
    let body: Vec<StudentResponse> = students.into_iter().map(StudentResponse::from).collect();
    Ok(Json(body))
}

/// `POST /students` — Add a student.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    summary = "Add a student",
    description = "Creates a student with status `present`, score 0 and selection count 0.",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student added", body = MessageResponse),
    )
)]
pub async fn add_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, RosterError> {
    state.roster_service.add_student(req.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Student added"))))
}

/// `POST /students/batch` — Add many students at once.
///
/// # Errors
///
/// Returns [`RosterError::NoStudentsProvided`] when the payload holds no
/// entries.
#[utoipa::path(
    post,
    path = "/api/students/batch",
    tag = "Students",
    summary = "Batch add students",
    description = "Accepts `{students: [...]}` or `{names: [...]}`. Entries with a blank name are skipped.",
    request_body = BatchAddRequest,
    responses(
        (status = 201, description = "Students added", body = BatchAddResponse),
        (status = 400, description = "No students provided", body = ErrorResponse),
    )
)]
pub async fn batch_add_students(
    State(state): State<AppState>,
    Json(req): Json<BatchAddRequest>,
) -> Result<impl IntoResponse, RosterError> {
    let added = state
        .roster_service
        .add_students(req.into_candidates())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BatchAddResponse {
            message: format!("Added {added} students"),
            added,
        }),
    ))
}

/// `POST /students/import` — Import a roster from JSON or CSV.
///
/// # Errors
///
/// Returns [`RosterError::InvalidRequest`] for a missing or unparseable
/// payload, and [`RosterError::NoStudentsProvided`] when no row has a name.
#[utoipa::path(
    post,
    path = "/api/students/import",
    tag = "Students",
    summary = "Import students",
    description = "Accepts `{format: \"json\" | \"csv\", data}`. JSON data is an array of students; CSV data is text with a `name` header and an optional `student_id` column. Values are trimmed and rows with a blank name are skipped.",
    request_body = ImportStudentsRequest,
    responses(
        (status = 201, description = "Students imported", body = BatchAddResponse),
        (status = 400, description = "Invalid payload or no valid rows", body = ErrorResponse),
    )
)]
pub async fn import_students(
    State(state): State<AppState>,
    Json(req): Json<ImportStudentsRequest>,
) -> Result<impl IntoResponse, RosterError> {
    let candidates = req.into_candidates()?;
    let added = state.roster_service.add_students(candidates).await?;
    Ok((
        StatusCode::CREATED,
        Json(BatchAddResponse {
            message: format!("Imported {added} students"),
            added,
        }),
    ))
}

/// `DELETE /students/all` — Remove every student and reset ids.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    delete,
    path = "/api/students/all",
    tag = "Students",
    summary = "Delete all students",
    description = "Removes every student and restarts id numbering at 1. History is kept.",
    responses(
        (status = 200, description = "All students deleted", body = MessageResponse),
    )
)]
pub async fn delete_all_students(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RosterError> {
    state.roster_service.delete_all_students().await?;
    Ok(Json(MessageResponse::new("All students deleted")))
}

/// `DELETE /students/{id}` — Remove one student.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    summary = "Delete a student",
    description = "Removes a student. Unknown ids succeed without effect.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, RosterError> {
    state.roster_service.delete_student(id).await?;
    Ok(Json(MessageResponse::new("Student deleted")))
}

/// `PUT /students/{id}/status` — Set presence status.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    put,
    path = "/api/students/{id}/status",
    tag = "Students",
    summary = "Update status",
    description = "Stores any status string. Only `present` (or no status) makes a student eligible for spins.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, RosterError> {
    state
        .roster_service
        .update_status(id, req.status.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Status updated")))
}

/// `PUT /students/{id}/score` — Adjust score by a delta.
///
/// # Errors
///
/// Returns [`RosterError`] on storage failures.
#[utoipa::path(
    put,
    path = "/api/students/{id}/score",
    tag = "Students",
    summary = "Update score",
    description = "Adds `delta` (default 0) to the current score.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    request_body = UpdateScoreRequest,
    responses(
        (status = 200, description = "Score updated", body = MessageResponse),
    )
)]
pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateScoreRequest>,
) -> Result<impl IntoResponse, RosterError> {
    state
        .roster_service
        .update_score(id, req.delta.unwrap_or(0))
        .await?;
    Ok(Json(MessageResponse::new("Score updated")))
}

/// `PUT /students/{id}` — Edit name or external id.
///
/// # Errors
///
/// Returns [`RosterError::StudentNotFound`] if the student does not exist.
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    summary = "Edit a student",
    description = "Updates name and/or external id. Blank fields keep their current value.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, RosterError> {
    let student = state
        .roster_service
        .update_student(id, req.name.as_deref(), req.student_id.as_deref())
        .await?;
    Ok(Json(StudentResponse::from(student)))
}

/// Student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(add_student))
        .route("/students/batch", post(batch_add_students))
        .route("/students/import", post(import_students))
        .route("/students/all", delete(delete_all_students))
        .route("/students/{id}", put(update_student).delete(delete_student))
        .route("/students/{id}/status", put(update_status))
        .route("/students/{id}/score", put(update_score))
}
