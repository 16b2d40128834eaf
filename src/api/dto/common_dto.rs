//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::RosterStats;

/// Distinguishes an explicit `null` from an absent field when used with
/// `#[serde(default, deserialize_with = "present_field")]` on an
/// `Option<Option<T>>`.
pub(crate) fn present_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Plain acknowledgment returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query parameters for `GET /history`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of entries to return (1 to 100). Defaults to 100.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// History counters inside [`StatisticsResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryStatsDto {
    /// Total number of history entries.
    pub total: i64,
    /// Entries with a score attached.
    pub scored: i64,
    /// Entries still waiting for a score.
    pub pending: i64,
}

/// Response body for `GET /statistics`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    /// Total number of students.
    pub students: i64,
    /// Students whose status is `present` or unset.
    pub present: i64,
    /// `present / students`, `0.0` for an empty roster.
    pub attendance_rate: f64,
    /// Selection history counters.
    pub history: HistoryStatsDto,
}

impl From<RosterStats> for StatisticsResponse {
    fn from(stats: RosterStats) -> Self {
        Self {
            students: stats.students,
            present: stats.present,
            attendance_rate: stats.attendance_rate(),
            history: HistoryStatsDto {
                total: stats.history_total,
                scored: stats.history_scored,
                pending: stats.history_pending(),
            },
        }
    }
}
