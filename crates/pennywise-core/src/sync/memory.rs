// ── In-memory remote ──
//
// A `RemoteStore` kept entirely in process. Supports failure injection
// and artificial latency so sync behaviour can be exercised without a
// server.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use pennywise_api::{Collection, Fields, RawDocument};

use super::document::OWNER_FIELD;
use super::remote::RemoteStore;
use crate::error::CoreError;
use crate::model::OwnerId;

/// Process-local document store with merge-on-write semantics.
///
/// Queries return documents ordered by id.
#[derive(Default)]
pub struct MemoryRemote {
    docs: Mutex<BTreeMap<(&'static str, String), Value>>,
    fail_queries: AtomicBool,
    failing_writes: Mutex<HashSet<String>>,
    query_delay: Mutex<Option<Duration>>,
    upserts: AtomicUsize,
    queries: AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document verbatim, bypassing validation.
    pub async fn insert_raw(&self, collection: Collection, id: &str, doc: Value) {
        self.docs
            .lock()
            .await
            .insert((collection.as_str(), id.to_owned()), doc);
    }

    pub async fn document(&self, collection: Collection, id: &str) -> Option<Value> {
        self.docs
            .lock()
            .await
            .get(&(collection.as_str(), id.to_owned()))
            .cloned()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.docs
            .lock()
            .await
            .keys()
            .filter(|(c, _)| *c == collection.as_str())
            .count()
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make writes of document `id` fail, in any collection.
    pub async fn fail_writes_to(&self, id: &str) {
        self.failing_writes.lock().await.insert(id.to_owned());
    }

    /// Delay every query by `delay`.
    pub async fn set_query_delay(&self, delay: Option<Duration>) {
        *self.query_delay.lock().await = delay;
    }

    /// Total number of upserts attempted.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Total number of queries attempted.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn injected(operation: &str, id: &str) -> CoreError {
        CoreError::Remote {
            message: format!("injected {operation} failure for {id}"),
            status: Some(503),
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), CoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes.lock().await.contains(id) {
            return Err(Self::injected("write", id));
        }

        let mut docs = self.docs.lock().await;
        let slot = docs
            .entry((collection.as_str(), id.to_owned()))
            .or_insert_with(|| Value::Object(Fields::new()));
        match slot {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        Ok(())
    }

    async fn query_by_owner(
        &self,
        collection: Collection,
        owner: &OwnerId,
    ) -> Result<Vec<RawDocument>, CoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let delay = *self.query_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(Self::injected("query", collection.as_str()));
        }

        let docs = self.docs.lock().await;
        Ok(docs
            .iter()
            .filter(|((c, _), doc)| {
                *c == collection.as_str()
                    && doc.get(OWNER_FIELD).and_then(Value::as_str) == Some(owner.as_str())
            })
            .map(|((_, id), doc)| RawDocument {
                id: id.clone(),
                fields: doc.clone(),
            })
            .collect())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), CoreError> {
        if self.failing_writes.lock().await.contains(id) {
            return Err(Self::injected("delete", id));
        }
        self.docs.lock().await.remove(&(collection.as_str(), id.to_owned()));
        Ok(())
    }
}
