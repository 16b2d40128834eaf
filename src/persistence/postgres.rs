//! PostgreSQL implementation of the roster store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    HistoryEntry, NewHistoryEntry, NewStudent, RosterStats, RosterStore, STATUS_PRESENT, Student,
};
use crate::error::RosterError;

type StudentRow = (i64, String, Option<String>, i64, i64, Option<String>);
type HistoryRow = (
    i64,
    Option<i64>,
    Option<String>,
    String,
    Option<i64>,
    DateTime<Utc>,
);

const STUDENT_COLUMNS: &str = "id, name, student_id, score, selection_count, status";

fn student_from_row(
    (id, name, student_id, score, selection_count, status): StudentRow,
) -> Student {
    Student {
        id,
        name,
        student_id,
        score,
        selection_count,
        status,
    }
}

fn history_from_row(
    (id, student_id, student_name, mode, score_delta, created_at): HistoryRow,
) -> HistoryEntry {
    HistoryEntry {
        id,
        student_id,
        student_name,
        mode,
        score_delta,
        created_at,
    }
}

/// PostgreSQL-backed roster store using `sqlx::PgPool`.
///
/// Every call checks a connection out of the pool for the duration of one
/// statement (or one transaction) and hands it back on drop, so error
/// paths release connections too.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_students(&self) -> Result<Vec<Student>, RosterError> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(student_from_row).collect())
    }

    async fn present_students(&self) -> Result<Vec<Student>, RosterError> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students \
             WHERE status = $1 OR status IS NULL ORDER BY id"
        ))
        .bind(STATUS_PRESENT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(student_from_row).collect())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<i64, RosterError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO students (name, student_id, status) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&student.name)
        .bind(student.student_id.as_deref())
        .bind(STATUS_PRESENT)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, RosterError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for student in students {
            let result = sqlx::query(
                "INSERT INTO students (name, student_id, status) VALUES ($1, $2, $3)",
            )
            .bind(&student.name)
            .bind(student.student_id.as_deref())
            .bind(STATUS_PRESENT)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn delete_all_students(&self) -> Result<(), RosterError> {
        sqlx::query("TRUNCATE TABLE students RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_student(&self, id: i64) -> Result<u64, RosterError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn set_status(&self, id: i64, status: Option<&str>) -> Result<u64, RosterError> {
        let result = sqlx::query("UPDATE students SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn add_score(&self, id: i64, delta: i64) -> Result<u64, RosterError> {
        let result = sqlx::query("UPDATE students SET score = score + $1 WHERE id = $2")
            .bind(delta)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn increment_selection(&self, id: i64) -> Result<u64, RosterError> {
        let result =
            sqlx::query("UPDATE students SET selection_count = selection_count + 1 WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn update_profile(
        &self,
        id: i64,
        name: Option<&str>,
        student_id: Option<&str>,
    ) -> Result<Option<Student>, RosterError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "UPDATE students SET name = COALESCE($1, name), \
             student_id = COALESCE($2, student_id) \
             WHERE id = $3 RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(name)
        .bind(student_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(student_from_row))
    }

    async fn recent_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, RosterError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, student_id, student_name, mode, score_delta, created_at \
             FROM selection_history ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(history_from_row).collect())
    }

    async fn last_selected(&self) -> Result<Option<i64>, RosterError> {
        let student_id = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT student_id FROM selection_history ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(student_id.flatten())
    }

    async fn insert_history(&self, entry: &NewHistoryEntry) -> Result<i64, RosterError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO selection_history (student_id, student_name, mode, score_delta) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(entry.student_id)
        .bind(entry.student_name.as_deref())
        .bind(&entry.mode)
        .bind(entry.score_delta)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn clear_history(&self) -> Result<u64, RosterError> {
        let result = sqlx::query("DELETE FROM selection_history")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn score_latest_pending(
        &self,
        student_id: i64,
        score_delta: Option<i64>,
    ) -> Result<u64, RosterError> {
        let result = sqlx::query(
            "UPDATE selection_history SET score_delta = $1 WHERE id = ( \
                 SELECT id FROM selection_history \
                 WHERE student_id = $2 AND score_delta IS NULL \
                 ORDER BY created_at DESC, id DESC LIMIT 1 \
             )",
        )
        .bind(score_delta)
        .bind(student_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn statistics(&self) -> Result<RosterStats, RosterError> {
        let (students, present) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $1 OR status IS NULL) FROM students",
        )
        .bind(STATUS_PRESENT)
        .fetch_one(&self.pool)
        .await?;

        let (history_total, history_scored) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(score_delta) FROM selection_history",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RosterStats {
            students,
            present,
            history_total,
            history_scored,
        })
    }
}
