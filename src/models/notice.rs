// SPDX-License-Identifier: MIT

//! Notice-board model. Notices are immutable once posted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored notice record. There is no edit or delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    /// Document ID
    pub id: String,
    /// Notice text (non-empty)
    pub content: String,
    /// When the notice was posted
    pub created_at: DateTime<Utc>,
    /// Identity token of the author
    pub created_by: String,
}

/// Input for posting a notice.
#[derive(Debug, Clone, Validate)]
pub struct NewNotice {
    #[validate(length(min = 1, message = "notice text is required"))]
    pub content: String,
}

impl NewNotice {
    pub fn trimmed(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}
