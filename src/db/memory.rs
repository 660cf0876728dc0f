// SPDX-License-Identifier: MIT

//! In-memory store backend for tests and offline development.
//!
//! Mirrors the snapshot semantics of the Firestore backend: every change
//! delivers a full materialization of the collection, never a delta. Carries
//! fault-injection hooks so retry and listener-failure paths can be exercised
//! without a live database.

use crate::db::{
    sort_events_store_order, sort_notices_store_order, CollectionKind, CollectionListener,
    Snapshot,
};
use crate::error::{AppError, Result};
use crate::models::{Event, Notice, ScorePublication};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Broadcast capacity; snapshot forwarders that lag simply re-materialize.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    events: DashMap<String, Event>,
    notices: DashMap<String, Notice>,
    scores: DashMap<String, ScorePublication>,
    changes: broadcast::Sender<CollectionKind>,
    broken: DashMap<CollectionKind, ()>,
    fail_next_writes: AtomicU32,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                events: DashMap::new(),
                notices: DashMap::new(),
                scores: DashMap::new(),
                changes,
                broken: DashMap::new(),
                fail_next_writes: AtomicU32::new(0),
                writes: AtomicU64::new(0),
            }),
        }
    }

    pub fn add_event(&self, event: &Event) -> Result<()> {
        self.write_gate()?;
        self.inner.events.insert(event.id.clone(), event.clone());
        self.notify(CollectionKind::Events);
        Ok(())
    }

    pub fn add_notice(&self, notice: &Notice) -> Result<()> {
        self.write_gate()?;
        self.inner.notices.insert(notice.id.clone(), notice.clone());
        self.notify(CollectionKind::Notices);
        Ok(())
    }

    pub fn set_scores(&self, publication: &ScorePublication) -> Result<()> {
        self.write_gate()?;
        self.inner
            .scores
            .insert(publication.id.clone(), publication.clone());
        self.notify(CollectionKind::Scores);
        Ok(())
    }

    pub fn watch_events(&self) -> CollectionListener<Event> {
        self.watch(CollectionKind::Events, |inner| {
            let mut items: Vec<Event> = inner.events.iter().map(|e| e.value().clone()).collect();
            sort_events_store_order(&mut items);
            items
        })
    }

    pub fn watch_notices(&self) -> CollectionListener<Notice> {
        self.watch(CollectionKind::Notices, |inner| {
            let mut items: Vec<Notice> = inner.notices.iter().map(|e| e.value().clone()).collect();
            sort_notices_store_order(&mut items);
            items
        })
    }

    pub fn watch_scores(&self) -> CollectionListener<ScorePublication> {
        // Scores are unordered; sort by id only so snapshots are deterministic.
        self.watch(CollectionKind::Scores, |inner| {
            let mut items: Vec<ScorePublication> =
                inner.scores.iter().map(|e| e.value().clone()).collect();
            items.sort_by(|a, b| a.id.cmp(&b.id));
            items
        })
    }

    // ─── Fault injection ─────────────────────────────────────────

    /// Make the next `n` write calls fail with a store error.
    pub fn fail_next_writes(&self, n: u32) {
        self.inner.fail_next_writes.store(n, Ordering::SeqCst);
    }

    /// Terminate current and future listeners on `kind` with an error.
    pub fn break_listener(&self, kind: CollectionKind) {
        self.inner.broken.insert(kind, ());
        let _ = self.inner.changes.send(kind);
    }

    /// Write calls observed so far, including injected failures.
    pub fn writes_observed(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    // ─── Internals ───────────────────────────────────────────────

    fn write_gate(&self) -> Result<()> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .inner
            .fail_next_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::Store("injected write failure".to_string()));
        }
        Ok(())
    }

    fn notify(&self, kind: CollectionKind) {
        // Send fails only when no listener is subscribed, which is fine.
        let _ = self.inner.changes.send(kind);
    }

    fn watch<T, F>(&self, kind: CollectionKind, materialize: F) -> CollectionListener<T>
    where
        T: Send + 'static,
        F: Fn(&Inner) -> Vec<T> + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let inner = Arc::clone(&self.inner);

        let task = tokio::spawn(async move {
            let mut changes = inner.changes.subscribe();

            if !deliver(&inner, &tx, kind, &materialize).await {
                return;
            }
            loop {
                match changes.recv().await {
                    Ok(changed) if changed == kind => {
                        if !deliver(&inner, &tx, kind, &materialize).await {
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        // Missed notifications collapse into one fresh snapshot.
                        if !deliver(&inner, &tx, kind, &materialize).await {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        CollectionListener::new(rx, task)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Send the current snapshot (or the break error); returns false once the
/// subscription should end.
async fn deliver<T, F>(
    inner: &Inner,
    tx: &mpsc::Sender<Snapshot<T>>,
    kind: CollectionKind,
    materialize: &F,
) -> bool
where
    F: Fn(&Inner) -> Vec<T>,
{
    if inner.broken.contains_key(&kind) {
        let _ = tx
            .send(Err(AppError::Subscription {
                collection: kind.name(),
                message: "listener terminated".to_string(),
            }))
            .await;
        return false;
    }

    tx.send(Ok(materialize(inner))).await.is_ok()
}
