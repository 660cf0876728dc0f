// SPDX-License-Identifier: MIT

//! Write paths: validation short-circuit, retry behavior, upsert semantics.

mod common;

use campus_board::db::Store;
use campus_board::error::AppError;
use campus_board::identity::SessionState;
use campus_board::models::{NewEvent, NewNotice, Role, ScoreSheet};
use campus_board::sync::CollectionSync;
use common::{new_event, score_row, wait_for};
use std::sync::Arc;

fn sheet(event_id: &str, rows: Vec<campus_board::models::ScoreRow>) -> ScoreSheet {
    ScoreSheet {
        event_id: event_id.to_string(),
        event_title: "Sports Day".to_string(),
        rows,
    }
}

#[tokio::test]
async fn blank_event_fields_never_reach_the_store() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    let result = sync
        .publish_event(
            NewEvent {
                title: "   ".to_string(),
                ..new_event("ignored", (2025, 11, 14))
            },
            Role::Teacher,
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(store.writes_observed(), 0);
}

#[tokio::test]
async fn blank_notice_never_reaches_the_store() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    let result = sync
        .publish_notice(
            NewNotice {
                content: " \n ".to_string(),
            },
            "uid-test",
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(store.writes_observed(), 0);
}

#[tokio::test]
async fn score_sheet_requires_event_and_nonblank_rows() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    let no_event = sync
        .publish_scores(sheet("  ", vec![score_row("Asha", "9.5", "1")]), "t-1")
        .await;
    assert!(matches!(no_event, Err(AppError::Validation(_))));

    let all_blank = sync
        .publish_scores(
            sheet("evt-1", vec![score_row("Asha", "", ""), score_row("Ben", " ", "")]),
            "t-1",
        )
        .await;
    assert!(matches!(all_blank, Err(AppError::Validation(_))));

    assert_eq!(store.writes_observed(), 0);
}

#[tokio::test]
async fn blank_rows_are_dropped_before_persisting() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    let publication = sync
        .publish_scores(
            sheet(
                "evt-1",
                vec![
                    score_row("Asha", "9.5", "1"),
                    score_row("Ben", "", ""),
                    score_row("Chen", "", "2"),
                ],
            ),
            "t-1",
        )
        .await
        .expect("publish should succeed");

    assert_eq!(publication.results.len(), 2);
    assert!(publication.results.iter().all(|r| !r.is_blank()));
}

#[tokio::test]
async fn republishing_scores_replaces_the_earlier_sheet() {
    let store = Arc::new(Store::in_memory());
    let mut sync = CollectionSync::new(Arc::clone(&store));
    sync.start(&SessionState::Ready {
        identity_token: "t-1".to_string(),
    });

    let mut scores = sync.scores();

    sync.publish_scores(sheet("evt-1", vec![score_row("Asha", "8.0", "2")]), "t-1")
        .await
        .unwrap();
    let second = sync
        .publish_scores(sheet("evt-1", vec![score_row("Asha", "9.5", "1")]), "t-1")
        .await
        .unwrap();

    let state = wait_for(&mut scores, |s| {
        s.items.len() == 1 && s.items[0].results == second.results
    })
    .await;

    assert_eq!(state.items.len(), 1, "upsert, not append");
    assert_eq!(state.items[0].event_id, "evt-1");
    assert_eq!(state.items[0].results[0].score, "9.5");
    assert_eq!(state.items[0].published_at, second.published_at);
}

#[tokio::test(start_paused = true)]
async fn transient_store_failures_are_retried_to_success() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    store.fail_next_writes(2);

    let published = sync
        .publish_event(new_event("Chess Tournament", (2025, 12, 1)), Role::Teacher)
        .await
        .expect("third attempt should succeed");

    assert_eq!(store.writes_observed(), 3);
    assert_eq!(published.title, "Chess Tournament");
}

#[tokio::test(start_paused = true)]
async fn persistent_store_failure_surfaces_operation_failed() {
    let store = Arc::new(Store::in_memory());
    let sync = CollectionSync::new(Arc::clone(&store));

    store.fail_next_writes(10);

    let result = sync
        .publish_event(new_event("Chess Tournament", (2025, 12, 1)), Role::Teacher)
        .await;

    assert_eq!(store.writes_observed(), 3, "budget is three total attempts");
    match result {
        Err(AppError::OperationFailed { attempts, cause }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*cause, AppError::Store(_)));
        }
        other => panic!("expected OperationFailed, got {:?}", other.map(|e| e.id)),
    }
}
