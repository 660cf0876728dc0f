// SPDX-License-Identifier: MIT

//! Live collection synchronization.
//!
//! Once the identity session is ready, `CollectionSync` opens three
//! independent subscriptions (events, notices, scores) and forwards each
//! incoming snapshot — normalized and, for events, merged with the seed set —
//! into a watch channel. Consumers always see a fully materialized collection,
//! never a partial delta. Writes go through the store wrapped in the retry
//! policy; the cached collections are never mutated directly.

pub mod merge;

pub use merge::merge_with_seed;

use crate::db::{CollectionListener, Store};
use crate::error::{AppError, ErrorMessage, Result};
use crate::identity::SessionState;
use crate::models::seed::seed_events;
use crate::models::{Event, NewEvent, NewNotice, Notice, Role, ScorePublication, ScoreSheet};
use crate::retry;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;
use validator::Validate;

/// Materialized view of one live collection.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    /// Set when this collection's listener died; the data is stale from then
    /// on, but the other collections keep functioning.
    pub error: Option<ErrorMessage>,
}

// Manual impl: the derive would needlessly require `T: Default`.
impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

/// Manager for the three live subscriptions and the write paths.
pub struct CollectionSync {
    store: Arc<Store>,
    events_tx: watch::Sender<CollectionState<Event>>,
    notices_tx: watch::Sender<CollectionState<Notice>>,
    scores_tx: watch::Sender<CollectionState<ScorePublication>>,
    forwarders: Vec<tokio::task::JoinHandle<()>>,
}

impl CollectionSync {
    pub fn new(store: Arc<Store>) -> Self {
        let (events_tx, _) = watch::channel(CollectionState::default());
        let (notices_tx, _) = watch::channel(CollectionState::default());
        let (scores_tx, _) = watch::channel(CollectionState::default());
        Self {
            store,
            events_tx,
            notices_tx,
            scores_tx,
            forwarders: Vec::new(),
        }
    }

    /// Live events: non-suppressed seed entries first, then live entries in
    /// store order.
    pub fn events(&self) -> watch::Receiver<CollectionState<Event>> {
        self.events_tx.subscribe()
    }

    /// Live notices, newest first.
    pub fn notices(&self) -> watch::Receiver<CollectionState<Notice>> {
        self.notices_tx.subscribe()
    }

    /// Live score publications.
    pub fn scores(&self) -> watch::Receiver<CollectionState<ScorePublication>> {
        self.scores_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.forwarders.is_empty()
    }

    /// Open the three subscriptions.
    ///
    /// A no-op unless `session` is ready: no subscriptions are opened and no
    /// error is produced. If subscriptions are already open they are torn down
    /// first — unsubscribe always precedes a new subscription for the same
    /// collection.
    pub fn start(&mut self, session: &SessionState) {
        if !session.is_ready() {
            tracing::debug!("session not ready; no subscriptions opened");
            return;
        }
        self.stop();

        let seed = seed_events();
        self.forwarders = vec![
            tokio::spawn(forward(
                self.store.watch_events(),
                self.events_tx.clone(),
                move |live| merge_with_seed(&seed, &live),
                "events",
            )),
            tokio::spawn(forward(
                self.store.watch_notices(),
                self.notices_tx.clone(),
                |notices| notices,
                "notices",
            )),
            tokio::spawn(forward(
                self.store.watch_scores(),
                self.scores_tx.clone(),
                |scores| scores,
                "scores",
            )),
        ];
        tracing::info!("live subscriptions opened");
    }

    /// Tear down all subscriptions. Idempotent; also run on drop.
    pub fn stop(&mut self) {
        if self.forwarders.is_empty() {
            return;
        }
        // Aborting a forwarder drops its listener, which unsubscribes.
        for task in self.forwarders.drain(..) {
            task.abort();
        }
        tracing::info!("live subscriptions closed");
    }

    // ─── Write Paths ─────────────────────────────────────────────

    /// Validate and persist a new event. Validation failures never reach the
    /// store; store failures are retried with backoff.
    pub async fn publish_event(&self, input: NewEvent, author: Role) -> Result<Event> {
        let input = input.trimmed();
        input.validate()?;

        let event = Event {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            date: input.date,
            description: input.description,
            category: input.category,
            created_at: Utc::now(),
            created_by: author,
        };

        retry::with_backoff(
            || async { self.store.add_event(&event).await },
            retry::DEFAULT_MAX_ATTEMPTS,
        )
        .await?;

        tracing::info!(event_id = %event.id, title = %event.title, "event published");
        Ok(event)
    }

    /// Validate and persist a new notice.
    pub async fn publish_notice(&self, input: NewNotice, author_token: &str) -> Result<Notice> {
        let input = input.trimmed();
        input.validate()?;

        let notice = Notice {
            id: Uuid::new_v4().to_string(),
            content: input.content,
            created_at: Utc::now(),
            created_by: author_token.to_string(),
        };

        retry::with_backoff(
            || async { self.store.add_notice(&notice).await },
            retry::DEFAULT_MAX_ATTEMPTS,
        )
        .await?;

        tracing::info!(notice_id = %notice.id, "notice published");
        Ok(notice)
    }

    /// Publish a score sheet for an event.
    ///
    /// Rows with neither score nor rank are dropped; the write is an upsert
    /// keyed by the event ID, so republishing replaces the earlier sheet. The
    /// upsert is what makes the retry wrapper safe here.
    pub async fn publish_scores(
        &self,
        sheet: ScoreSheet,
        teacher_id: &str,
    ) -> Result<ScorePublication> {
        let event_id = sheet.event_id.trim().to_string();
        if event_id.is_empty() {
            return Err(AppError::Validation("an event must be selected".to_string()));
        }

        let results: Vec<_> = sheet.rows.into_iter().filter(|r| !r.is_blank()).collect();
        if results.is_empty() {
            return Err(AppError::Validation("no scores entered".to_string()));
        }

        let publication = ScorePublication {
            id: event_id.clone(),
            event_id,
            event_title: sheet.event_title,
            results,
            published_at: Utc::now(),
            teacher_id: teacher_id.to_string(),
        };

        retry::with_backoff(
            || async { self.store.set_scores(&publication).await },
            retry::DEFAULT_MAX_ATTEMPTS,
        )
        .await?;

        tracing::info!(
            event_id = %publication.event_id,
            rows = publication.results.len(),
            "scores published"
        );
        Ok(publication)
    }
}

impl Drop for CollectionSync {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Forward snapshots from one listener into its watch channel until the
/// listener ends or errors. On error the collection is marked stale and only
/// this forwarder stops; the other collections are unaffected.
async fn forward<T, F>(
    mut listener: CollectionListener<T>,
    tx: watch::Sender<CollectionState<T>>,
    normalize: F,
    collection: &'static str,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(Vec<T>) -> Vec<T> + Send + 'static,
{
    while let Some(snapshot) = listener.next().await {
        match snapshot {
            Ok(items) => {
                let items = normalize(items);
                tracing::debug!(collection, count = items.len(), "snapshot applied");
                tx.send_replace(CollectionState { items, error: None });
            }
            Err(err) => {
                tracing::error!(collection, error = %err, "listener failed; collection is stale");
                tx.send_modify(|state| state.error = Some(ErrorMessage::from(&err)));
                break;
            }
        }
    }
}
