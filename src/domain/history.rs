//! Selection history: one row per recorded spin outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of history entries returned by a listing.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// A row from the `selection_history` table.
///
/// `student_name` is a snapshot taken when the entry was recorded, not a
/// live join against `students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// System-assigned row identifier.
    pub id: i64,
    /// Identifier of the selected student.
    pub student_id: Option<i64>,
    /// Student name at the time of selection.
    pub student_name: Option<String>,
    /// Selection mode tag (`"random"`, `"fair"`, `"rollCall"`, ...).
    pub mode: String,
    /// Score awarded for this selection. `None` means not yet scored.
    pub score_delta: Option<i64>,
    /// Server-assigned creation time, the ordering key.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Returns `true` if no score has been attached yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.score_delta.is_none()
    }
}

/// Insert payload for a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    /// Identifier of the selected student.
    pub student_id: Option<i64>,
    /// Student name snapshot.
    pub student_name: Option<String>,
    /// Selection mode tag.
    pub mode: String,
    /// Initial score delta; `None` records a pending entry.
    pub score_delta: Option<i64>,
}

/// Clamps a requested listing size to `1..=MAX_HISTORY_LIMIT`.
#[must_use]
pub fn clamp_history_limit(requested: u32) -> u32 {
    requested.clamp(1, MAX_HISTORY_LIMIT)
}
