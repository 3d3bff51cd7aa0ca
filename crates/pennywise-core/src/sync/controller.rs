// ── Remote sync controller ──
//
// Mirrors the store into the remote document collections. Two background
// tasks: one reloads the whole snapshot on every identity transition,
// the other writes every collection back after a quiet period.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pennywise_api::{Collection, Fields};

use super::document;
use super::remote::RemoteStore;
use crate::action::{Action, DataSnapshot};
use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::identity::Identity;
use crate::model::{Account, BudgetCategory, Entity, EntityId, Goal, OwnerId, Transaction};
use crate::state::AppState;
use crate::store::Store;

/// How a reload ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The snapshot was replaced with the remote data.
    Applied,
    /// A query failed; the load error was surfaced.
    Failed,
    /// The identity changed or the controller shut down first; the
    /// result was not applied.
    Superseded,
}

/// How a persist attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Every document was written.
    Written(usize),
    /// Nothing written: a reload is in progress.
    SkippedLoading,
    /// Nothing written: the snapshot carries an error.
    SkippedErrored,
    /// Nothing written: nobody is signed in.
    SkippedSignedOut,
    /// Nothing written: the snapshot was loaded for a different user
    /// than the one now signed in.
    SkippedOwnerChanged,
    /// At least one write failed; the save error was surfaced.
    Failed,
}

// ── SyncController ───────────────────────────────────────────────────

/// Keeps the store and the remote collections in step.
///
/// Cheaply cloneable via `Arc<SyncInner>`. Construct it, then call
/// [`start()`](Self::start) to spawn the background tasks and
/// [`shutdown()`](Self::shutdown) to stop them.
#[derive(Clone)]
pub struct SyncController {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    store: Store,
    remote: Arc<dyn RemoteStore>,
    identity: Identity,
    config: SyncConfig,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncController {
    pub fn new(
        store: Store,
        remote: Arc<dyn RemoteStore>,
        identity: Identity,
        config: SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(SyncInner {
                store,
                remote,
                identity,
                config,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the identity watcher and the debounced persister.
    ///
    /// The current identity is handled immediately: if someone is
    /// already signed in, their data starts loading.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("sync controller already started");
            return;
        }

        let identity_rx = self.inner.identity.subscribe();
        handles.push(tokio::spawn(identity_task(self.clone(), identity_rx)));

        let state_rx = self.inner.store.receiver();
        handles.push(tokio::spawn(persist_task(self.clone(), state_rx)));
        debug!(debounce_ms = self.inner.config.debounce.as_millis(), "sync controller started");
    }

    /// Stop background tasks and wait for them to finish.
    ///
    /// An in-flight reload is abandoned without dispatching; a pending
    /// debounced write is dropped. Call [`flush()`](Self::flush) first
    /// to keep it.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("sync controller stopped");
    }

    // ── Reload ───────────────────────────────────────────────────────

    /// Replace the snapshot with everything `owner` has stored remotely.
    ///
    /// Collections are queried one after the other. Invalid documents
    /// are dropped. Nothing is dispatched once `token` is cancelled.
    pub async fn reload(&self, owner: &OwnerId, token: &CancellationToken) -> ReloadOutcome {
        let store = &self.inner.store;
        if !store.dispatch_if_live(token, Action::SetLoading(true)) {
            return ReloadOutcome::Superseded;
        }

        let fetched = tokio::select! {
            biased;
            () = token.cancelled() => return ReloadOutcome::Superseded,
            res = self.fetch_snapshot(owner) => res,
        };

        match fetched {
            Ok(snapshot) => {
                let counts = (
                    snapshot.accounts.len(),
                    snapshot.transactions.len(),
                    snapshot.goals.len(),
                    snapshot.budget_categories.len(),
                );
                if !store.dispatch_if_live(token, Action::SetData(snapshot)) {
                    return ReloadOutcome::Superseded;
                }
                info!(
                    owner = %owner,
                    accounts = counts.0,
                    transactions = counts.1,
                    goals = counts.2,
                    budget_categories = counts.3,
                    "reload complete"
                );
                ReloadOutcome::Applied
            }
            Err(e) => {
                let message = self.inner.config.load_error_message.clone();
                if !store.dispatch_if_live(token, Action::SetError(Some(message))) {
                    return ReloadOutcome::Superseded;
                }
                warn!(owner = %owner, error = %e, "reload failed");
                ReloadOutcome::Failed
            }
        }
    }

    async fn fetch_snapshot(&self, owner: &OwnerId) -> Result<DataSnapshot, CoreError> {
        let accounts: Vec<Account> = self.fetch_collection(owner).await?;
        let transactions: Vec<Transaction> = self.fetch_collection(owner).await?;
        let goals: Vec<Goal> = self.fetch_collection(owner).await?;
        let budget_categories: Vec<BudgetCategory> = self.fetch_collection(owner).await?;

        let selected_account = accounts.first().map(|a| a.id.clone());
        Ok(DataSnapshot {
            accounts,
            transactions,
            goals,
            budget_categories,
            selected_account,
            owner: Some(owner.clone()),
        })
    }

    async fn fetch_collection<T>(&self, owner: &OwnerId) -> Result<Vec<T>, CoreError>
    where
        T: Entity + DeserializeOwned,
    {
        let raw = self.inner.remote.query_by_owner(T::COLLECTION, owner).await?;
        let fetched = raw.len();
        let decoded: Vec<T> = raw.into_iter().filter_map(document::decode).collect();
        if decoded.len() < fetched {
            debug!(
                collection = %T::COLLECTION,
                dropped = fetched - decoded.len(),
                "ignored invalid documents"
            );
        }
        Ok(decoded)
    }

    // ── Persist ──────────────────────────────────────────────────────

    /// Write the current snapshot back unless it is loading or errored.
    ///
    /// Nothing is written once the signed-in user differs from the one
    /// the snapshot was loaded for. A failed write surfaces the save
    /// error in the snapshot. Writes that completed stay written.
    pub async fn persist(&self) -> PersistOutcome {
        let state = self.inner.store.state();
        if state.is_loading {
            return PersistOutcome::SkippedLoading;
        }
        if state.error.is_some() {
            return PersistOutcome::SkippedErrored;
        }
        let Some(current) = self.inner.identity.current() else {
            return PersistOutcome::SkippedSignedOut;
        };
        if state.loaded_for.as_ref() != Some(&current) {
            debug!(owner = %current, "snapshot belongs to another user: not persisting");
            return PersistOutcome::SkippedOwnerChanged;
        }

        match self.save_all(&state).await {
            Ok(written) => {
                info!(documents = written, "persist complete");
                PersistOutcome::Written(written)
            }
            Err(CoreError::OwnerChanged) => PersistOutcome::SkippedOwnerChanged,
            Err(e) => {
                warn!(error = %e, "persist failed");
                self.inner.store.dispatch(Action::SetError(Some(
                    self.inner.config.save_error_message.clone(),
                )));
                PersistOutcome::Failed
            }
        }
    }

    /// Persist immediately, without waiting for the debounce timer.
    pub async fn flush(&self) -> PersistOutcome {
        self.persist().await
    }

    /// Upsert every entity of `state` for the user it was loaded for.
    ///
    /// Fails with [`CoreError::OwnerChanged`] unless that user is still
    /// signed in. Each document is encoded and written independently, so
    /// one bad record does not hold back the rest. Returns the first
    /// failure, if any.
    pub async fn save_all(&self, state: &AppState) -> Result<usize, CoreError> {
        let owner = self
            .inner
            .identity
            .current()
            .ok_or(CoreError::Unauthenticated)?;
        if state.loaded_for.as_ref() != Some(&owner) {
            return Err(CoreError::OwnerChanged);
        }
        let now = Utc::now();

        let mut docs: Vec<Encoded> = Vec::new();
        encode_each(&mut docs, &state.accounts, &owner, now);
        encode_each(&mut docs, &state.transactions, &owner, now);
        encode_each(&mut docs, &state.goals, &owner, now);
        encode_each(&mut docs, &state.budget_categories, &owner, now);

        write_each(self.inner.remote.as_ref(), docs).await
    }

    // ── Remote deletes ───────────────────────────────────────────────

    /// Delete an account remotely together with its transactions, then
    /// drop it from the snapshot.
    ///
    /// A remote failure aborts before the snapshot is touched.
    pub async fn delete_account(&self, id: &EntityId) -> Result<(), CoreError> {
        if self.inner.identity.current().is_none() {
            return Err(CoreError::Unauthenticated);
        }
        let state = self.inner.store.state();
        let remote = &self.inner.remote;

        remote.delete(Collection::Accounts, id.as_str()).await?;
        for tx in state.transactions.iter().filter(|t| &t.account_id == id) {
            remote.delete(Collection::Transactions, tx.id.as_str()).await?;
        }

        self.inner.store.dispatch(Action::DeleteAccount(id.clone()));
        debug!(account = %id, "account deleted remotely");
        Ok(())
    }

    /// Delete a single document remotely, then apply `action`.
    ///
    /// Persisting only upserts, so records removed locally would come
    /// back on the next reload without this.
    pub async fn delete_remote(
        &self,
        collection: Collection,
        id: &EntityId,
        action: Action,
    ) -> Result<(), CoreError> {
        if self.inner.identity.current().is_none() {
            return Err(CoreError::Unauthenticated);
        }
        self.inner.remote.delete(collection, id.as_str()).await?;
        self.inner.store.dispatch(action);
        Ok(())
    }
}

/// One document ready to write, or the reason it could not be encoded.
type Encoded = Result<(Collection, EntityId, Fields), CoreError>;

fn encode_each<T: Entity + Serialize>(
    docs: &mut Vec<Encoded>,
    items: &[T],
    owner: &OwnerId,
    now: chrono::DateTime<Utc>,
) {
    docs.extend(items.iter().map(|item| {
        document::encode(item, owner, now).map(|fields| (T::COLLECTION, item.id().clone(), fields))
    }));
}

/// Issue every write concurrently and wait for all of them.
async fn write_each(remote: &dyn RemoteStore, docs: Vec<Encoded>) -> Result<usize, CoreError> {
    let total = docs.len();
    let results = join_all(docs.into_iter().map(|doc| async move {
        let (collection, id, fields) = doc?;
        remote.upsert(collection, id.as_str(), fields).await
    }))
    .await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    match results.into_iter().find_map(Result::err) {
        Some(first) => {
            debug!(total, failed, "some documents were not written");
            Err(first)
        }
        None => Ok(total),
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Reload on every identity transition, superseding any reload still in
/// flight.
async fn identity_task(ctrl: SyncController, mut rx: watch::Receiver<Option<OwnerId>>) {
    let cancel = ctrl.inner.cancel.clone();
    let mut in_flight: Option<(CancellationToken, JoinHandle<ReloadOutcome>)> = None;

    loop {
        let owner = rx.borrow_and_update().clone();
        if let Some((token, _)) = in_flight.take() {
            token.cancel();
        }

        match owner {
            None => {
                debug!("signed out: resetting state");
                ctrl.inner.store.dispatch(Action::ResetData);
            }
            Some(owner) => {
                debug!(owner = %owner, "identity changed: reloading");
                let token = cancel.child_token();
                let job = {
                    let ctrl = ctrl.clone();
                    let token = token.clone();
                    tokio::spawn(async move { ctrl.reload(&owner, &token).await })
                };
                in_flight = Some((token, job));
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            res = rx.changed() => {
                if res.is_err() {
                    break;
                }
            }
        }
    }

    if let Some((token, job)) = in_flight {
        token.cancel();
        let _ = job.await;
    }
}

/// Write the snapshot back once the collections have been quiet for the
/// configured debounce period. Every further change restarts the timer.
async fn persist_task(ctrl: SyncController, mut rx: watch::Receiver<Arc<AppState>>) {
    let cancel = ctrl.inner.cancel.clone();
    let debounce = ctrl.inner.config.debounce;
    let mut seen = rx.borrow_and_update().clone();

    loop {
        // Wait for the collections to change.
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                res = rx.changed() => {
                    if res.is_err() {
                        return;
                    }
                }
            }
            let latest = rx.borrow_and_update().clone();
            let changed = !latest.same_collections(&seen);
            seen = latest;
            if changed {
                break;
            }
        }

        if !debounced(&cancel, &mut rx, &mut seen, debounce).await {
            return;
        }
        let outcome = ctrl.persist().await;
        debug!(?outcome, "debounced persist");
    }
}

/// Sleep until `debounce` has passed without a collection change.
/// Returns `false` when the task should stop.
async fn debounced(
    cancel: &CancellationToken,
    rx: &mut watch::Receiver<Arc<AppState>>,
    seen: &mut Arc<AppState>,
    debounce: Duration,
) -> bool {
    let mut deadline = Instant::now() + debounce;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return false,
            () = sleep_until(deadline) => return true,
            res = rx.changed() => {
                if res.is_err() {
                    return false;
                }
                let latest = rx.borrow_and_update().clone();
                if !latest.same_collections(seen) {
                    deadline = Instant::now() + debounce;
                }
                *seen = latest;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::AccountKind;
    use crate::sync::MemoryRemote;
    use rust_decimal_macros::dec;

    fn account(id: &str) -> Account {
        Account {
            id: id.into(),
            name: id.into(),
            balance: dec!(1),
            kind: AccountKind::Checking,
            currency: "EUR".into(),
        }
    }

    /// Serializes to a bare string, which no document can hold.
    #[derive(Serialize)]
    struct Scalar(EntityId);

    impl Entity for Scalar {
        const COLLECTION: Collection = Collection::Goals;

        fn id(&self) -> &EntityId {
            &self.0
        }
    }

    #[tokio::test]
    async fn unencodable_document_does_not_hold_back_the_rest() {
        let remote = MemoryRemote::new();
        let owner = OwnerId::from("u1");
        let now = Utc::now();

        let mut docs = Vec::new();
        encode_each(&mut docs, &[account("a1"), account("a2")], &owner, now);
        encode_each(&mut docs, &[Scalar("g1".into())], &owner, now);
        encode_each(&mut docs, &[account("a3")], &owner, now);
        assert_eq!(docs.len(), 4);

        let err = write_each(&remote, docs).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument { ref id, .. } if id == "g1"));
        assert_eq!(remote.count(Collection::Accounts).await, 3);
        assert_eq!(remote.count(Collection::Goals).await, 0);
        assert_eq!(remote.upsert_count(), 3);
    }

    #[tokio::test]
    async fn every_document_is_stamped_with_the_given_owner() {
        let remote = MemoryRemote::new();
        let mut docs = Vec::new();
        encode_each(&mut docs, &[account("a1")], &"u1".into(), Utc::now());

        assert_eq!(write_each(&remote, docs).await.unwrap(), 1);
        let doc = remote.document(Collection::Accounts, "a1").await.unwrap();
        assert_eq!(doc["userId"], "u1");
    }
}
