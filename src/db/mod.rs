// SPDX-License-Identifier: MIT

//! Document store layer.
//!
//! [`Store`] is the single capability the rest of the crate talks to. It has
//! two backends: Firestore (production, optionally against the emulator) and
//! an in-memory one for tests and offline development. Live queries are
//! delivered as full snapshots over a [`CollectionListener`]; writes are plain
//! async calls that the sync layer wraps in its retry policy.

pub mod firestore;
pub mod memory;

use crate::error::Result;
use crate::models::{Event, Notice, ScorePublication};
use tokio::sync::mpsc;

/// Collection names as constants.
pub mod collections {
    /// Parent collection scoping one application deployment; events, notices
    /// and scores live underneath `app_instances/{instance_id}` so multiple
    /// deployments sharing a project do not collide.
    pub const INSTANCES: &str = "app_instances";
    pub const EVENTS: &str = "events";
    pub const NOTICES: &str = "notices";
    pub const SCORES: &str = "scores";
}

/// The three live collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Events,
    Notices,
    Scores,
}

impl CollectionKind {
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Events => collections::EVENTS,
            CollectionKind::Notices => collections::NOTICES,
            CollectionKind::Scores => collections::SCORES,
        }
    }
}

/// One full materialization of a live query, or the error that ended it.
pub type Snapshot<T> = Result<Vec<T>>;

/// Handle to a live collection subscription.
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe)) cancels
/// the underlying listener; cancellation happens exactly once.
pub struct CollectionListener<T> {
    rx: mpsc::Receiver<Snapshot<T>>,
    task: tokio::task::JoinHandle<()>,
    active: bool,
}

impl<T> CollectionListener<T> {
    pub(crate) fn new(rx: mpsc::Receiver<Snapshot<T>>, task: tokio::task::JoinHandle<()>) -> Self {
        Self {
            rx,
            task,
            active: true,
        }
    }

    /// Next snapshot, or `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Snapshot<T>> {
        if !self.active {
            return None;
        }
        self.rx.recv().await
    }

    /// Cancel the subscription. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.active {
            self.active = false;
            self.task.abort();
            self.rx.close();
        }
    }
}

impl<T> Drop for CollectionListener<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Store order for events: date descending, id as tiebreak.
pub(crate) fn sort_events_store_order(events: &mut [Event]) {
    events.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}

/// Store order for notices: newest first, id as tiebreak.
pub(crate) fn sort_notices_store_order(notices: &mut [Notice]) {
    notices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// Document store facade over the configured backend.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreStore),
    Memory(memory::MemoryStore),
}

impl Store {
    /// Connect to Firestore (or the emulator, if `FIRESTORE_EMULATOR_HOST`
    /// is set).
    pub async fn connect(project_id: &str, app_instance_id: &str) -> Result<Self> {
        let backend = firestore::FirestoreStore::connect(project_id, app_instance_id).await?;
        Ok(Self {
            backend: Backend::Firestore(backend),
        })
    }

    /// In-memory store for tests and offline development.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(memory::MemoryStore::new()),
        }
    }

    /// Subscribe to the events collection (store order: date descending).
    pub fn watch_events(&self) -> CollectionListener<Event> {
        match &self.backend {
            Backend::Firestore(fs) => fs.watch_events(),
            Backend::Memory(mem) => mem.watch_events(),
        }
    }

    /// Subscribe to the notices collection (newest first).
    pub fn watch_notices(&self) -> CollectionListener<Notice> {
        match &self.backend {
            Backend::Firestore(fs) => fs.watch_notices(),
            Backend::Memory(mem) => mem.watch_notices(),
        }
    }

    /// Subscribe to the score publications collection (unordered).
    pub fn watch_scores(&self) -> CollectionListener<ScorePublication> {
        match &self.backend {
            Backend::Firestore(fs) => fs.watch_scores(),
            Backend::Memory(mem) => mem.watch_scores(),
        }
    }

    /// Insert a new event document.
    pub async fn add_event(&self, event: &Event) -> Result<()> {
        match &self.backend {
            Backend::Firestore(fs) => fs.add_event(event).await,
            Backend::Memory(mem) => mem.add_event(event),
        }
    }

    /// Insert a new notice document.
    pub async fn add_notice(&self, notice: &Notice) -> Result<()> {
        match &self.backend {
            Backend::Firestore(fs) => fs.add_notice(notice).await,
            Backend::Memory(mem) => mem.add_notice(notice),
        }
    }

    /// Upsert a score publication; the document ID is the event ID, so
    /// republishing for the same event replaces the earlier sheet.
    pub async fn set_scores(&self, publication: &ScorePublication) -> Result<()> {
        match &self.backend {
            Backend::Firestore(fs) => fs.set_scores(publication).await,
            Backend::Memory(mem) => mem.set_scores(publication),
        }
    }

    // ─── Fault-injection hooks (memory backend only) ─────────────

    /// Make the next `n` writes fail. No-op on the Firestore backend.
    pub fn fail_next_writes(&self, n: u32) {
        if let Backend::Memory(mem) = &self.backend {
            mem.fail_next_writes(n);
        }
    }

    /// Terminate one collection's listeners with an error. No-op on the
    /// Firestore backend.
    pub fn break_listener(&self, kind: CollectionKind) {
        if let Backend::Memory(mem) = &self.backend {
            mem.break_listener(kind);
        }
    }

    /// Number of write calls observed (attempted, including failed ones).
    /// Always zero on the Firestore backend.
    pub fn writes_observed(&self) -> u64 {
        match &self.backend {
            Backend::Firestore(_) => 0,
            Backend::Memory(mem) => mem.writes_observed(),
        }
    }
}
