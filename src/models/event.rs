// SPDX-License-Identifier: MIT

//! School event model.

use crate::models::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category of a school event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Sports,
    Academic,
    Cultural,
    Meeting,
    Other,
}

/// Stored event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Document ID
    pub id: String,
    /// Event title; also the identity key for seed/live deduplication
    pub title: String,
    /// Calendar date (no time component)
    pub date: NaiveDate,
    /// Free-text description
    pub description: String,
    /// Event category
    pub category: EventCategory,
    /// When this event was created
    pub created_at: DateTime<Utc>,
    /// Role of the author
    pub created_by: Role,
}

/// Input for creating a new event, validated before any store call.
#[derive(Debug, Clone, Validate)]
pub struct NewEvent {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub category: EventCategory,
}

impl NewEvent {
    /// Trim surrounding whitespace so blank-but-padded fields fail validation.
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_fails_validation() {
        let input = NewEvent {
            title: "   ".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
            description: "Annual track and field day".to_string(),
            category: EventCategory::Sports,
        }
        .trimmed();

        assert!(input.validate().is_err());
    }

    #[test]
    fn complete_input_passes_validation() {
        let input = NewEvent {
            title: "Sports Day".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
            description: "Annual track and field day".to_string(),
            category: EventCategory::Sports,
        }
        .trimmed();

        assert!(input.validate().is_ok());
    }
}
