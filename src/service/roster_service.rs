//! Roster service: student bookkeeping, spin draw, selection history.

use std::sync::Arc;

use crate::domain::selection::{self, SelectionMode};
use crate::domain::{
    HistoryEntry, NewHistoryEntry, NewStudent, RosterStats, RosterStore, Student,
    clamp_history_limit,
};
use crate::error::RosterError;

/// Orchestration layer for all roster operations.
///
/// Stateless coordinator over a [`RosterStore`]. Not-found ids on delete
/// and update are silent no-ops, mirroring the underlying `UPDATE` /
/// `DELETE` statements; only the profile edit reports a missing student.
#[derive(Debug, Clone)]
pub struct RosterService {
    store: Arc<dyn RosterStore>,
    default_history_limit: u32,
}

impl RosterService {
    /// Creates a new `RosterService`.
    ///
    /// `default_history_limit` is used when a history listing does not ask
    /// for a size; it is clamped to `1..=100`.
    #[must_use]
    pub fn new(store: Arc<dyn RosterStore>, default_history_limit: u32) -> Self {
        Self {
            store,
            default_history_limit: clamp_history_limit(default_history_limit),
        }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RosterStore> {
        &self.store
    }

    /// Lists every student in storage order.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn list_students(&self) -> Result<Vec<Student>, RosterError> {
        self.store.list_students().await
    }

    /// Adds one student. The name is not validated.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn add_student(&self, student: NewStudent) -> Result<i64, RosterError> {
        let id = self.store.insert_student(&student).await?;
        tracing::info!(id, name = %student.name, "student added");
        Ok(id)
    }

    /// Adds a batch of students, skipping entries with a blank name.
    ///
    /// Returns the number of students written, which may be zero when every
    /// entry was blank.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NoStudentsProvided`] if `students` is empty,
    /// or a [`RosterError`] if the store fails.
    pub async fn add_students(&self, students: Vec<NewStudent>) -> Result<u64, RosterError> {
        if students.is_empty() {
            return Err(RosterError::NoStudentsProvided);
        }
        let supplied = students.len();
        let valid: Vec<NewStudent> = students
            .into_iter()
            .filter(|s| !s.has_blank_name())
            .collect();

        let added = if valid.is_empty() {
            0
        } else {
            self.store.insert_students(&valid).await?
        };
        tracing::info!(supplied, added, "batch add");
        Ok(added)
    }

    /// Removes every student and restarts id numbering at 1. History is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn delete_all_students(&self) -> Result<(), RosterError> {
        self.store.delete_all_students().await?;
        tracing::warn!("all students deleted");
        Ok(())
    }

    /// Removes one student; a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn delete_student(&self, id: i64) -> Result<(), RosterError> {
        let removed = self.store.delete_student(id).await?;
        tracing::info!(id, removed, "student deleted");
        Ok(())
    }

    /// Sets a student's status to any caller-supplied value.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn update_status(&self, id: i64, status: Option<&str>) -> Result<(), RosterError> {
        let updated = self.store.set_status(id, status).await?;
        tracing::debug!(id, ?status, updated, "status updated");
        Ok(())
    }

    /// Adds `delta` to a student's score.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn update_score(&self, id: i64, delta: i64) -> Result<(), RosterError> {
        let updated = self.store.add_score(id, delta).await?;
        tracing::debug!(id, delta, updated, "score updated");
        Ok(())
    }

    /// Edits a student's name and/or external id. Blank values are ignored;
    /// score and selection count are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::StudentNotFound`] if the id does not exist,
    /// or a [`RosterError`] if the store fails.
    pub async fn update_student(
        &self,
        id: i64,
        name: Option<&str>,
        student_id: Option<&str>,
    ) -> Result<Student, RosterError> {
        self.store
            .update_profile(id, non_blank(name), non_blank(student_id))
            .await?
            .ok_or(RosterError::StudentNotFound(id))
    }

    /// Draws one present student and bumps their selection count.
    ///
    /// The returned record is the snapshot read before the increment, so
    /// its `selection_count` is one lower than the stored value.
    ///
    /// With `avoid_repeat`, the student at the head of the selection
    /// history is left out of the draw whenever someone else is available.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnknownMode`] for an unrecognized mode,
    /// [`RosterError::NoActiveStudents`] if nobody is present, or a
    /// [`RosterError`] if the store fails.
    pub async fn spin(&self, mode: &str, avoid_repeat: bool) -> Result<Student, RosterError> {
        let mode: SelectionMode = mode.parse()?;

        let mut candidates = self.store.present_students().await?;
        if candidates.is_empty() {
            return Err(RosterError::NoActiveStudents);
        }
        if avoid_repeat {
            let previous = self.store.last_selected().await?;
            candidates = selection::exclude_previous(candidates, previous);
        }

        let selected = {
            let mut rng = rand::thread_rng();
            selection::draw(&candidates, mode, &mut rng).cloned()
        };
        let Some(selected) = selected else {
            return Err(RosterError::Internal(
                "draw returned nothing from a non-empty pool".to_string(),
            ));
        };

        self.store.increment_selection(selected.id).await?;
        tracing::info!(
            id = selected.id,
            name = %selected.name,
            %mode,
            pool = candidates.len(),
            "student selected"
        );
        Ok(selected)
    }

    /// Returns the most recent history entries, newest first.
    ///
    /// `limit` defaults to the configured size and is clamped to `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn history(&self, limit: Option<u32>) -> Result<Vec<HistoryEntry>, RosterError> {
        let limit = limit.map_or(self.default_history_limit, clamp_history_limit);
        self.store.recent_history(limit).await
    }

    /// Appends a history entry.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn add_history(&self, entry: NewHistoryEntry) -> Result<i64, RosterError> {
        let id = self.store.insert_history(&entry).await?;
        tracing::debug!(id, student_id = ?entry.student_id, mode = %entry.mode, "history added");
        Ok(id)
    }

    /// Deletes the whole selection history.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn clear_history(&self) -> Result<u64, RosterError> {
        let removed = self.store.clear_history().await?;
        tracing::warn!(removed, "history cleared");
        Ok(removed)
    }

    /// Attaches a score to the newest pending history entry of a student.
    ///
    /// Returns the number of entries updated (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn score_history(
        &self,
        student_id: i64,
        score_delta: Option<i64>,
    ) -> Result<u64, RosterError> {
        let updated = self
            .store
            .score_latest_pending(student_id, score_delta)
            .await?;
        tracing::debug!(student_id, ?score_delta, updated, "history scored");
        Ok(updated)
    }

    /// Returns attendance and history counters.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] if the store fails.
    pub async fn statistics(&self) -> Result<RosterStats, RosterError> {
        self.store.statistics().await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::InMemoryStore;

    fn make_service() -> RosterService {
        RosterService::new(Arc::new(InMemoryStore::new()), 100)
    }

    async fn seed(service: &RosterService, names: &[&str]) {
        for name in names {
            if service.add_student(NewStudent::new(*name, None)).await.is_err() {
                panic!("seeding failed");
            }
        }
    }

    async fn students(service: &RosterService) -> Vec<Student> {
        let Ok(students) = service.list_students().await else {
            panic!("list failed");
        };
        students
    }

    #[tokio::test]
    async fn batch_drops_blank_names() {
        let service = make_service();
        let batch = ["A", "", "  ", "B"]
            .iter()
            .map(|n| NewStudent::new(*n, None))
            .collect();

        let result = service.add_students(batch).await;
        assert!(matches!(result, Ok(2)));

        let names: Vec<String> = students(&service).await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let service = make_service();
        let result = service.add_students(Vec::new()).await;
        assert!(matches!(result, Err(RosterError::NoStudentsProvided)));
        assert!(students(&service).await.is_empty());
    }

    #[tokio::test]
    async fn all_blank_batch_adds_zero() {
        let service = make_service();
        let batch = vec![NewStudent::new(" ", None), NewStudent::new("", None)];
        assert!(matches!(service.add_students(batch).await, Ok(0)));
    }

    #[tokio::test]
    async fn score_deltas_accumulate() {
        let service = make_service();
        seed(&service, &["A"]).await;
        assert!(service.update_score(1, 5).await.is_ok());
        assert!(service.update_score(1, -2).await.is_ok());
        assert!(service.update_score(1, 0).await.is_ok());
        assert_eq!(students(&service).await.first().map(|s| s.score), Some(3));
    }

    #[tokio::test]
    async fn updates_on_missing_ids_succeed() {
        let service = make_service();
        assert!(service.delete_student(99).await.is_ok());
        assert!(service.update_status(99, Some("absent")).await.is_ok());
        assert!(service.update_score(99, 3).await.is_ok());
        assert!(matches!(
            service.update_student(99, Some("X"), None).await,
            Err(RosterError::StudentNotFound(99))
        ));
    }

    #[tokio::test]
    async fn spin_without_present_students_fails() {
        let service = make_service();
        assert!(matches!(
            service.spin("random", false).await,
            Err(RosterError::NoActiveStudents)
        ));

        seed(&service, &["A", "B"]).await;
        let _ = service.update_status(1, Some("absent")).await;
        let _ = service.update_status(2, Some("sick")).await;
        assert!(matches!(
            service.spin("fair", false).await,
            Err(RosterError::NoActiveStudents)
        ));
    }

    #[tokio::test]
    async fn spin_rejects_unknown_mode_without_side_effects() {
        let service = make_service();
        seed(&service, &["A"]).await;
        assert!(matches!(
            service.spin("lottery", false).await,
            Err(RosterError::UnknownMode(_))
        ));
        assert_eq!(students(&service).await.first().map(|s| s.selection_count), Some(0));
    }

    #[tokio::test]
    async fn spin_increments_count_but_returns_prior_snapshot() {
        let service = make_service();
        seed(&service, &["A", "B", "C"]).await;

        let Ok(selected) = service.spin("random", false).await else {
            panic!("spin failed");
        };
        assert_eq!(selected.selection_count, 0);

        let after = students(&service).await;
        for student in &after {
            let expected = i64::from(student.id == selected.id);
            assert_eq!(student.selection_count, expected);
        }
    }

    #[tokio::test]
    async fn fair_spin_never_picks_above_minimum() {
        let service = make_service();
        seed(&service, &["A", "B", "C"]).await;
        for _ in 0..3 {
            let _ = service.store().increment_selection(3).await;
        }

        for _ in 0..50 {
            let Ok(before) = service.list_students().await else {
                panic!("list failed");
            };
            let min = before.iter().map(|s| s.selection_count).min().unwrap_or(0);
            let Ok(selected) = service.spin("fair", false).await else {
                panic!("spin failed");
            };
            assert_eq!(selected.selection_count, min);
        }
        // The two zero-count students were levelled up before C got a turn.
        let counts: Vec<i64> = students(&service)
            .await
            .iter()
            .map(|s| s.selection_count)
            .collect();
        let spread = counts.iter().max().unwrap_or(&0) - counts.iter().min().unwrap_or(&0);
        assert!(spread <= 1, "fair mode should keep counts level: {counts:?}");
    }

    #[tokio::test]
    async fn absent_students_are_never_drawn() {
        let service = make_service();
        seed(&service, &["A", "B"]).await;
        let _ = service.update_status(1, Some("absent")).await;
        for _ in 0..20 {
            let Ok(selected) = service.spin("rollCall", false).await else {
                panic!("spin failed");
            };
            assert_eq!(selected.id, 2);
        }
    }

    #[tokio::test]
    async fn avoid_repeat_skips_last_recorded_student() {
        let service = make_service();
        seed(&service, &["A", "B"]).await;
        let _ = service
            .add_history(NewHistoryEntry {
                student_id: Some(1),
                student_name: Some("A".to_string()),
                mode: "random".to_string(),
                score_delta: None,
            })
            .await;

        for _ in 0..20 {
            let Ok(selected) = service.spin("random", true).await else {
                panic!("spin failed");
            };
            assert_eq!(selected.id, 2);
        }
    }

    #[tokio::test]
    async fn history_limit_is_clamped() {
        let service = make_service();
        for i in 0..120 {
            let _ = service
                .add_history(NewHistoryEntry {
                    student_id: Some(i),
                    student_name: None,
                    mode: "random".to_string(),
                    score_delta: Some(0),
                })
                .await;
        }
        assert!(matches!(service.history(None).await, Ok(h) if h.len() == 100));
        assert!(matches!(service.history(Some(500)).await, Ok(h) if h.len() == 100));
        assert!(matches!(service.history(Some(5)).await, Ok(h) if h.len() == 5));
        assert!(matches!(service.clear_history().await, Ok(120)));
        assert!(matches!(service.history(None).await, Ok(h) if h.is_empty()));
    }

    #[tokio::test]
    async fn update_student_ignores_blank_fields() {
        let service = make_service();
        let _ = service
            .add_student(NewStudent::new("Ada", Some("S-1".to_string())))
            .await;
        let Ok(updated) = service.update_student(1, Some("  "), Some("S-2")).await else {
            panic!("update failed");
        };
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.student_id.as_deref(), Some("S-2"));
    }
}
