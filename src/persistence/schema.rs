//! Table bootstrap. Tables are created if missing; existing tables are
//! left untouched.

use sqlx::PgPool;

use crate::error::RosterError;

const CREATE_STUDENTS: &str = "\
CREATE TABLE IF NOT EXISTS students (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    student_id TEXT,
    score BIGINT NOT NULL DEFAULT 0,
    selection_count BIGINT NOT NULL DEFAULT 0,
    status TEXT DEFAULT 'present'
)";

const CREATE_SELECTION_HISTORY: &str = "\
CREATE TABLE IF NOT EXISTS selection_history (
    id BIGSERIAL PRIMARY KEY,
    student_id BIGINT,
    student_name TEXT,
    mode TEXT NOT NULL DEFAULT 'random',
    score_delta BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_HISTORY_INDEX: &str = "\
CREATE INDEX IF NOT EXISTS selection_history_student_created_idx \
ON selection_history (student_id, created_at DESC)";

/// Creates the `students` and `selection_history` tables if missing.
///
/// # Errors
///
/// Returns a [`RosterError::Persistence`] if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RosterError> {
    tracing::info!("ensuring roster schema");
    for statement in [CREATE_STUDENTS, CREATE_SELECTION_HISTORY, CREATE_HISTORY_INDEX] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
