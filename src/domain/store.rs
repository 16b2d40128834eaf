//! Storage abstraction for students and selection history.

use std::fmt;

use async_trait::async_trait;

use super::{HistoryEntry, NewHistoryEntry, NewStudent, RosterStats, Student};
use crate::error::RosterError;

/// Backing store for the roster.
///
/// Each method corresponds to one statement (or one short statement set)
/// against the store. Updates keyed by id report the number of rows they
/// touched; callers decide whether zero is an error. Implemented by
/// [`crate::persistence::postgres::PostgresStore`] and
/// [`super::InMemoryStore`].
#[async_trait]
pub trait RosterStore: Send + Sync + fmt::Debug {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Returns every student, ordered by id.
    async fn list_students(&self) -> Result<Vec<Student>, RosterError>;

    /// Returns the students eligible for a spin (status `present` or unset).
    async fn present_students(&self) -> Result<Vec<Student>, RosterError>;

    /// Inserts one student and returns its new id.
    async fn insert_student(&self, student: &NewStudent) -> Result<i64, RosterError>;

    /// Inserts several students together and returns how many were written.
    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, RosterError>;

    /// Removes every student and restarts id assignment at 1.
    async fn delete_all_students(&self) -> Result<(), RosterError>;

    /// Removes one student.
    async fn delete_student(&self, id: i64) -> Result<u64, RosterError>;

    /// Overwrites the status of one student.
    async fn set_status(&self, id: i64, status: Option<&str>) -> Result<u64, RosterError>;

    /// Applies `score = score + delta` to one student.
    async fn add_score(&self, id: i64, delta: i64) -> Result<u64, RosterError>;

    /// Applies `selection_count = selection_count + 1` to one student.
    async fn increment_selection(&self, id: i64) -> Result<u64, RosterError>;

    /// Replaces name and/or external id of one student, returning the row
    /// after the update or `None` if the id does not exist.
    async fn update_profile(
        &self,
        id: i64,
        name: Option<&str>,
        student_id: Option<&str>,
    ) -> Result<Option<Student>, RosterError>;

    /// Returns up to `limit` history entries, newest first.
    async fn recent_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, RosterError>;

    /// Returns the student id of the newest history entry, if any.
    async fn last_selected(&self) -> Result<Option<i64>, RosterError>;

    /// Appends a history entry and returns its id.
    async fn insert_history(&self, entry: &NewHistoryEntry) -> Result<i64, RosterError>;

    /// Deletes every history entry.
    async fn clear_history(&self) -> Result<u64, RosterError>;

    /// Sets `score_delta` on the newest pending entry of a student.
    async fn score_latest_pending(
        &self,
        student_id: i64,
        score_delta: Option<i64>,
    ) -> Result<u64, RosterError>;

    /// Returns attendance and history counters.
    async fn statistics(&self) -> Result<RosterStats, RosterError>;
}
