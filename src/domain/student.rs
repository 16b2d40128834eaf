//! Student records and their presence status.

use serde::{Deserialize, Serialize};

/// Status value marking a student as eligible for selection.
pub const STATUS_PRESENT: &str = "present";

/// A student row from the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// System-assigned identifier, stable for the lifetime of the row.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional external identifier (e.g. a school register number).
    pub student_id: Option<String>,
    /// Cumulative score. Only ever changed by a delta.
    pub score: i64,
    /// Number of times this student has been drawn by a spin.
    pub selection_count: i64,
    /// Free-form status. `None` is treated the same as `"present"`.
    pub status: Option<String>,
}

impl Student {
    /// Returns `true` if this student may be drawn by a spin.
    #[must_use]
    pub fn is_present(&self) -> bool {
        is_present_status(self.status.as_deref())
    }
}

/// Returns `true` for `"present"` or a missing status.
#[must_use]
pub fn is_present_status(status: Option<&str>) -> bool {
    matches!(status, None | Some(STATUS_PRESENT))
}

/// Insert payload for a new student.
///
/// New students always start with score 0, selection count 0 and status
/// `"present"`; only the caller-provided fields live here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Display name, stored as supplied.
    pub name: String,
    /// Optional external identifier.
    pub student_id: Option<String>,
}

impl NewStudent {
    /// Creates an insert payload.
    #[must_use]
    pub fn new(name: impl Into<String>, student_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            student_id,
        }
    }

    /// Returns `true` if the name is empty or whitespace only.
    #[must_use]
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}
