//! Aggregate counters over the roster and its selection history.

use serde::Serialize;

/// Attendance and history counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RosterStats {
    /// Total number of students.
    pub students: i64,
    /// Students whose status is `present` or unset.
    pub present: i64,
    /// Total number of history entries.
    pub history_total: i64,
    /// History entries with a score attached.
    pub history_scored: i64,
}

impl RosterStats {
    /// Share of present students, `0.0` for an empty roster.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn attendance_rate(&self) -> f64 {
        if self.students == 0 {
            0.0
        } else {
            self.present as f64 / self.students as f64
        }
    }

    /// History entries still waiting for a score.
    #[must_use]
    pub const fn history_pending(&self) -> i64 {
        self.history_total.saturating_sub(self.history_scored)
    }
}
