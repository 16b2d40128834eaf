//! In-process roster store.
//!
//! [`InMemoryStore`] keeps both tables behind a single
//! [`tokio::sync::RwLock`]. It backs the test suite and the
//! `PERSISTENCE_ENABLED=false` mode, where nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    HistoryEntry, NewHistoryEntry, NewStudent, RosterStats, RosterStore, STATUS_PRESENT, Student,
};
use crate::error::RosterError;

#[derive(Debug)]
struct Tables {
    students: Vec<Student>,
    next_student_id: i64,
    history: Vec<HistoryEntry>,
    next_history_id: i64,
}

impl Tables {
    fn student_mut(&mut self, id: i64) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    fn push_student(&mut self, student: &NewStudent) -> i64 {
        let id = self.next_student_id;
        self.next_student_id += 1;
        self.students.push(Student {
            id,
            name: student.name.clone(),
            student_id: student.student_id.clone(),
            score: 0,
            selection_count: 0,
            status: Some(STATUS_PRESENT.to_string()),
        });
        id
    }

    /// History sorted newest first, ties broken by id.
    fn history_newest_first(&self) -> Vec<&HistoryEntry> {
        let mut entries: Vec<&HistoryEntry> = self.history.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        entries
    }
}

/// Roster store held entirely in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store. The first student receives id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                students: Vec::new(),
                next_student_id: 1,
                history: Vec::new(),
                next_history_id: 1,
            }),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RosterStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_students(&self) -> Result<Vec<Student>, RosterError> {
        Ok(self.tables.read().await.students.clone())
    }

    async fn present_students(&self) -> Result<Vec<Student>, RosterError> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .filter(|s| s.is_present())
            .cloned()
            .collect())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<i64, RosterError> {
        Ok(self.tables.write().await.push_student(student))
    }

    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        for student in students {
            tables.push_student(student);
        }
        Ok(students.len() as u64)
    }

    async fn delete_all_students(&self) -> Result<(), RosterError> {
        let mut tables = self.tables.write().await;
        tables.students.clear();
        tables.next_student_id = 1;
        Ok(())
    }

    async fn delete_student(&self, id: i64) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        let before = tables.students.len();
        tables.students.retain(|s| s.id != id);
        Ok((before - tables.students.len()) as u64)
    }

    async fn set_status(&self, id: i64, status: Option<&str>) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        Ok(tables.student_mut(id).map_or(0, |s| {
            s.status = status.map(str::to_string);
            1
        }))
    }

    async fn add_score(&self, id: i64, delta: i64) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        Ok(tables.student_mut(id).map_or(0, |s| {
            s.score = s.score.saturating_add(delta);
            1
        }))
    }

    async fn increment_selection(&self, id: i64) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        Ok(tables.student_mut(id).map_or(0, |s| {
            s.selection_count = s.selection_count.saturating_add(1);
            1
        }))
    }

    async fn update_profile(
        &self,
        id: i64,
        name: Option<&str>,
        student_id: Option<&str>,
    ) -> Result<Option<Student>, RosterError> {
        let mut tables = self.tables.write().await;
        Ok(tables.student_mut(id).map(|s| {
            if let Some(name) = name {
                s.name = name.to_string();
            }
            if let Some(student_id) = student_id {
                s.student_id = Some(student_id.to_string());
            }
            s.clone()
        }))
    }

    async fn recent_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, RosterError> {
        let tables = self.tables.read().await;
        Ok(tables
            .history_newest_first()
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn last_selected(&self) -> Result<Option<i64>, RosterError> {
        let tables = self.tables.read().await;
        Ok(tables
            .history_newest_first()
            .first()
            .and_then(|e| e.student_id))
    }

    async fn insert_history(&self, entry: &NewHistoryEntry) -> Result<i64, RosterError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_history_id;
        tables.next_history_id += 1;
        tables.history.push(HistoryEntry {
            id,
            student_id: entry.student_id,
            student_name: entry.student_name.clone(),
            mode: entry.mode.clone(),
            score_delta: entry.score_delta,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn clear_history(&self) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        let removed = tables.history.len() as u64;
        tables.history.clear();
        Ok(removed)
    }

    async fn score_latest_pending(
        &self,
        student_id: i64,
        score_delta: Option<i64>,
    ) -> Result<u64, RosterError> {
        let mut tables = self.tables.write().await;
        let target = tables
            .history_newest_first()
            .into_iter()
            .find(|e| e.student_id == Some(student_id) && e.is_pending())
            .map(|e| e.id);
        let Some(target) = target else {
            return Ok(0);
        };
        Ok(tables
            .history
            .iter_mut()
            .find(|e| e.id == target)
            .map_or(0, |e| {
                e.score_delta = score_delta;
                1
            }))
    }

    async fn statistics(&self) -> Result<RosterStats, RosterError> {
        let tables = self.tables.read().await;
        Ok(RosterStats {
            students: tables.students.len() as i64,
            present: tables.students.iter().filter(|s| s.is_present()).count() as i64,
            history_total: tables.history.len() as i64,
            history_scored: tables.history.iter().filter(|e| !e.is_pending()).count() as i64,
        })
    }
}
