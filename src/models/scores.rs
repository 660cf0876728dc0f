// SPDX-License-Identifier: MIT

//! Score publication model.
//!
//! A publication is keyed by the event it belongs to: republishing scores for
//! the same event replaces the earlier document (upsert, not append).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a published score sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub student_id: String,
    pub student_name: String,
    /// Free-text score (e.g. "9.5", "1st heat 12.3s")
    pub score: String,
    /// Free-text rank (e.g. "1", "runner-up")
    pub rank: String,
}

impl ScoreRow {
    /// A row with neither a score nor a rank carries no information and is
    /// dropped before persisting.
    pub fn is_blank(&self) -> bool {
        self.score.trim().is_empty() && self.rank.trim().is_empty()
    }
}

/// Stored score publication. The document ID equals `event_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePublication {
    /// Document ID (== event_id)
    pub id: String,
    /// Event these scores belong to
    pub event_id: String,
    /// Snapshot of the event title at publish time
    pub event_title: String,
    /// Ordered result rows, blanks already removed
    pub results: Vec<ScoreRow>,
    /// When the sheet was published
    pub published_at: DateTime<Utc>,
    /// Identity token of the publishing teacher
    pub teacher_id: String,
}

/// Input for publishing a score sheet.
#[derive(Debug, Clone)]
pub struct ScoreSheet {
    pub event_id: String,
    pub event_title: String,
    pub rows: Vec<ScoreRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(score: &str, rank: &str) -> ScoreRow {
        ScoreRow {
            student_id: "s-1".to_string(),
            student_name: "Asha".to_string(),
            score: score.to_string(),
            rank: rank.to_string(),
        }
    }

    #[test]
    fn blank_detection_requires_both_fields_empty() {
        assert!(row("", "").is_blank());
        assert!(row("  ", "\t").is_blank());
        assert!(!row("9.5", "").is_blank());
        assert!(!row("", "2").is_blank());
    }
}
