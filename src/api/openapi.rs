//! OpenAPI document for the roster API.

use utoipa::OpenApi;

use crate::api::dto::{
    BatchAddRequest, BatchAddResponse, CreateHistoryRequest, CreateStudentRequest,
    HistoryEntryResponse, HistoryStatsDto, ImportStudentsRequest, MessageResponse, SpinRequest,
    StatisticsResponse, StudentResponse, UpdateHistoryScoreRequest, UpdateScoreRequest,
    UpdateStatusRequest, UpdateStudentRequest,
};
use crate::api::handlers::{history, spin, statistics, students, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "roll-call",
        description = "Classroom roster, attendance, scoring and random/fair student selection."
    ),
    paths(
        students::list_students,
        students::add_student,
        students::batch_add_students,
        students::import_students,
        students::delete_all_students,
        students::delete_student,
        students::update_status,
        students::update_score,
        students::update_student,
        spin::spin,
        history::list_history,
        history::add_history,
        history::clear_history,
        history::update_history_score,
        statistics::statistics,
        system::health_handler,
    ),
    components(schemas(
        StudentResponse,
        CreateStudentRequest,
        BatchAddRequest,
        BatchAddResponse,
        ImportStudentsRequest,
        UpdateStatusRequest,
        UpdateScoreRequest,
        UpdateStudentRequest,
        SpinRequest,
        HistoryEntryResponse,
        CreateHistoryRequest,
        UpdateHistoryScoreRequest,
        StatisticsResponse,
        HistoryStatsDto,
        MessageResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Students", description = "Roster management"),
        (name = "Spin", description = "Random and fair selection"),
        (name = "History", description = "Selection log"),
        (name = "Statistics", description = "Attendance and history counters"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, serving the spec at `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/students",
            "/api/students/batch",
            "/api/students/import",
            "/api/students/all",
            "/api/students/{id}",
            "/api/students/{id}/status",
            "/api/students/{id}/score",
            "/api/spin",
            "/api/history",
            "/api/history/{student_id}",
            "/api/statistics",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
