// SPDX-License-Identifier: MIT

//! Fixed seed events shown before (and alongside) live data.
//!
//! A live event whose title equals a seed title is the same logical entity;
//! the live version wins and the seed copy is suppressed.

use crate::models::{Event, EventCategory, Role};
use chrono::{NaiveDate, TimeZone, Utc};

/// The five baseline events.
pub fn seed_events() -> Vec<Event> {
    [
        (
            "seed-1",
            "Sports Day",
            (2025, 11, 14),
            "Annual track and field day on the main ground.",
            EventCategory::Sports,
        ),
        (
            "seed-2",
            "Parent-Teacher Meeting",
            (2025, 11, 28),
            "Term progress discussion, classrooms 1-12.",
            EventCategory::Meeting,
        ),
        (
            "seed-3",
            "Science Exhibition",
            (2025, 12, 5),
            "Student projects on display in the main hall.",
            EventCategory::Academic,
        ),
        (
            "seed-4",
            "Annual Day Celebration",
            (2025, 12, 19),
            "Stage performances and the year-end prize ceremony.",
            EventCategory::Cultural,
        ),
        (
            "seed-5",
            "Winter Break Begins",
            (2025, 12, 24),
            "School closes for the winter holidays.",
            EventCategory::Other,
        ),
    ]
    .into_iter()
    .map(|(id, title, (y, m, d), description, category)| Event {
        id: id.to_string(),
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).expect("seed dates are valid"),
        description: description.to_string(),
        category,
        created_at: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
        created_by: Role::Teacher,
    })
    .collect()
}
