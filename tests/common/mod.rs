// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use campus_board::models::{EventCategory, NewEvent, ScoreRow};
use campus_board::sync::CollectionState;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::sync::watch;

/// Wait until a collection state satisfies `pred`, or time out.
pub async fn wait_for<T, F>(
    rx: &mut watch::Receiver<CollectionState<T>>,
    pred: F,
) -> CollectionState<T>
where
    T: Clone,
    F: Fn(&CollectionState<T>) -> bool,
{
    loop {
        {
            let current = rx.borrow_and_update();
            if pred(&current) {
                return current.clone();
            }
        }
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("timed out waiting for snapshot")
            .expect("snapshot sender dropped");
    }
}

pub fn new_event(title: &str, date: (i32, u32, u32)) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        description: format!("{} description", title),
        category: EventCategory::Other,
    }
}

pub fn score_row(student: &str, score: &str, rank: &str) -> ScoreRow {
    ScoreRow {
        student_id: format!("id-{}", student),
        student_name: student.to_string(),
        score: score.to_string(),
        rank: rank.to_string(),
    }
}
