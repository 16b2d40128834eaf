//! Selection history DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::present_field;
use crate::domain::{HistoryEntry, NewHistoryEntry, SelectionMode};

/// Request body for `POST /history`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateHistoryRequest {
    /// Identifier of the selected student.
    #[serde(default)]
    pub student_id: Option<i64>,
    /// Student name snapshot.
    #[serde(default)]
    pub student_name: Option<String>,
    /// Mode tag. Defaults to `"random"`; any string is stored.
    #[serde(default)]
    pub mode: Option<String>,
    /// Score for the selection. Omitted means 0, explicit `null` records a
    /// pending entry to be scored later.
    #[serde(default, deserialize_with = "present_field")]
    #[schema(value_type = Option<i64>)]
    pub score_delta: Option<Option<i64>>,
}

impl From<CreateHistoryRequest> for NewHistoryEntry {
    fn from(req: CreateHistoryRequest) -> Self {
        Self {
            student_id: req.student_id,
            student_name: req.student_name,
            mode: req
                .mode
                .unwrap_or_else(|| SelectionMode::Random.as_str().to_string()),
            score_delta: req.score_delta.unwrap_or(Some(0)),
        }
    }
}

/// Request body for `PUT /history/{student_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateHistoryScoreRequest {
    /// Score to attach to the newest pending entry.
    #[serde(default)]
    pub score_delta: Option<i64>,
}

/// A history entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryResponse {
    /// Row identifier.
    pub id: i64,
    /// Identifier of the selected student.
    pub student_id: Option<i64>,
    /// Student name at selection time.
    pub student_name: Option<String>,
    /// Mode tag.
    pub mode: String,
    /// Attached score, `null` while pending.
    pub score_delta: Option<i64>,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(e: HistoryEntry) -> Self {
        Self {
            id: e.id,
            student_id: e.student_id,
            student_name: e.student_name,
            mode: e.mode,
            score_delta: e.score_delta,
            created_at: e.created_at,
        }
    }
}
