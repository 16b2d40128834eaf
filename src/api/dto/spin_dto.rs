//! Spin request DTO.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SelectionMode;

/// Request body for `POST /spin`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SpinRequest {
    /// `"random"` (default), `"rollCall"` or `"fair"`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Skip the most recently recorded student when others are present.
    #[serde(default)]
    pub avoid_repeat: bool,
}

impl SpinRequest {
    /// Requested mode, falling back to `"random"`.
    #[must_use]
    pub fn mode_or_default(&self) -> &str {
        self.mode
            .as_deref()
            .unwrap_or(SelectionMode::Random.as_str())
    }
}
