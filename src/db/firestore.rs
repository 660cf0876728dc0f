// SPDX-License-Identifier: MIT

//! Firestore store backend.
//!
//! All documents live under `app_instances/{instance_id}` so deployments
//! sharing a project stay isolated. Live queries use Firestore listen targets;
//! per-document changes are folded into a local map and re-emitted as full
//! snapshots, matching the wholesale-replacement contract of the sync layer.

use crate::db::{
    collections, sort_events_store_order, sort_notices_store_order, CollectionKind,
    CollectionListener, Snapshot,
};
use crate::error::{AppError, Result};
use crate::models::{Event, Notice, ScorePublication};
use firestore::{
    FirestoreDb, FirestoreListenEvent, FirestoreListenerTarget, FirestoreMemListenStateStorage,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Firestore-backed store.
#[derive(Clone)]
pub struct FirestoreStore {
    db: FirestoreDb,
    app_instance_id: String,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with the emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str, app_instance_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        let db = if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            Self::create_emulator_client(project_id).await?
        } else {
            let db = FirestoreDb::new(project_id).await.map_err(|e| {
                AppError::Initialization(format!("Failed to connect to Firestore: {}", e))
            })?;
            tracing::info!(project = project_id, "Connected to Firestore");
            db
        };

        Ok(Self {
            db,
            app_instance_id: app_instance_id.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<FirestoreDb> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let db = FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Initialization(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(db)
    }

    // ─── Write Operations ────────────────────────────────────────

    /// Insert a new event document.
    pub async fn add_event(&self, event: &Event) -> Result<()> {
        let parent = self
            .db
            .parent_path(collections::INSTANCES, self.app_instance_id.clone())
            .map_err(|e| AppError::Store(e.to_string()))?;

        let _: () = self
            .db
            .fluent()
            .insert()
            .into(collections::EVENTS)
            .document_id(&event.id)
            .parent(&parent)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    /// Insert a new notice document.
    pub async fn add_notice(&self, notice: &Notice) -> Result<()> {
        let parent = self
            .db
            .parent_path(collections::INSTANCES, self.app_instance_id.clone())
            .map_err(|e| AppError::Store(e.to_string()))?;

        let _: () = self
            .db
            .fluent()
            .insert()
            .into(collections::NOTICES)
            .document_id(&notice.id)
            .parent(&parent)
            .object(notice)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    /// Upsert a score publication, keyed by event ID.
    pub async fn set_scores(&self, publication: &ScorePublication) -> Result<()> {
        let parent = self
            .db
            .parent_path(collections::INSTANCES, self.app_instance_id.clone())
            .map_err(|e| AppError::Store(e.to_string()))?;

        let _: () = self
            .db
            .fluent()
            .update()
            .in_col(collections::SCORES)
            .document_id(&publication.id)
            .parent(&parent)
            .object(publication)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    // ─── Live Queries ────────────────────────────────────────────

    pub fn watch_events(&self) -> CollectionListener<Event> {
        self.watch(CollectionKind::Events, |items: &mut Vec<Event>| {
            sort_events_store_order(items)
        })
    }

    pub fn watch_notices(&self) -> CollectionListener<Notice> {
        self.watch(CollectionKind::Notices, |items: &mut Vec<Notice>| {
            sort_notices_store_order(items)
        })
    }

    pub fn watch_scores(&self) -> CollectionListener<ScorePublication> {
        self.watch(CollectionKind::Scores, |_: &mut Vec<ScorePublication>| {})
    }

    /// Open a listen target on one collection and forward full snapshots.
    fn watch<T>(&self, kind: CollectionKind, sort: fn(&mut Vec<T>)) -> CollectionListener<T>
    where
        T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let store = self.clone();

        let task = tokio::spawn(async move {
            if let Err(err) = store.run_listener(kind, sort, tx.clone()).await {
                tracing::error!(
                    collection = kind.name(),
                    error = %err,
                    "listener terminated"
                );
                let _ = tx
                    .send(Err(AppError::Subscription {
                        collection: kind.name(),
                        message: err.to_string(),
                    }))
                    .await;
            }
        });

        CollectionListener::new(rx, task)
    }

    async fn run_listener<T>(
        &self,
        kind: CollectionKind,
        sort: fn(&mut Vec<T>),
        tx: mpsc::Sender<Snapshot<T>>,
    ) -> anyhow::Result<()>
    where
        T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let mut listener = self
            .db
            .create_listener(FirestoreMemListenStateStorage::new())
            .await?;

        let parent = self
            .db
            .parent_path(collections::INSTANCES, self.app_instance_id.clone())?;

        self.db
            .fluent()
            .select()
            .from(kind.name())
            .parent(&parent)
            .listen()
            .add_target(FirestoreListenerTarget::new(target_id(kind)), &mut listener)?;

        let docs: Arc<Mutex<BTreeMap<String, T>>> = Arc::new(Mutex::new(BTreeMap::new()));

        // An empty collection produces no document changes, so materialize it
        // up front; later snapshots replace this one wholesale.
        let _ = tx.send(Ok(Vec::new())).await;

        listener
            .start(move |event| {
                let docs = Arc::clone(&docs);
                let tx = tx.clone();
                async move {
                    let mut changed = false;
                    match event {
                        FirestoreListenEvent::DocumentChange(ref change) => {
                            if let Some(doc) = &change.document {
                                match FirestoreDb::deserialize_doc_to::<T>(doc) {
                                    Ok(obj) => {
                                        docs.lock().unwrap().insert(document_id(&doc.name), obj);
                                        changed = true;
                                    }
                                    Err(e) => {
                                        tracing::warn!(
                                            doc = %doc.name,
                                            error = %e,
                                            "skipping undeserializable document"
                                        );
                                    }
                                }
                            }
                        }
                        FirestoreListenEvent::DocumentDelete(ref del) => {
                            docs.lock().unwrap().remove(&document_id(&del.document));
                            changed = true;
                        }
                        FirestoreListenEvent::DocumentRemove(ref rem) => {
                            docs.lock().unwrap().remove(&document_id(&rem.document));
                            changed = true;
                        }
                        _ => {}
                    }

                    if changed {
                        let snapshot = {
                            let guard = docs.lock().unwrap();
                            let mut items: Vec<T> = guard.values().cloned().collect();
                            sort(&mut items);
                            items
                        };
                        let _ = tx.send(Ok(snapshot)).await;
                    }

                    Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
                }
            })
            .await?;

        // The listener lives as long as this task; cancelling the subscription
        // aborts the task, which drops and stops the listener.
        std::future::pending::<()>().await;
        Ok(())
    }
}

fn target_id(kind: CollectionKind) -> u32 {
    match kind {
        CollectionKind::Events => 1,
        CollectionKind::Notices => 2,
        CollectionKind::Scores => 3,
    }
}

/// Last path segment of a fully qualified Firestore document name.
fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_takes_last_segment() {
        let name = "projects/p/databases/(default)/documents/app_instances/x/events/evt-42";
        assert_eq!(document_id(name), "evt-42");
        assert_eq!(document_id("bare"), "bare");
    }

    #[test]
    fn target_ids_are_distinct() {
        let ids = [
            target_id(CollectionKind::Events),
            target_id(CollectionKind::Notices),
            target_id(CollectionKind::Scores),
        ];
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }
}
