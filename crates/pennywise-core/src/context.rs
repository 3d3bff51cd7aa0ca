// ── Application context ──
//
// Wires the store, the identity signal and the sync controller together
// and owns them for the lifetime of a session.

use std::sync::Arc;

use tracing::debug;

use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::store::{Store, StoreHandle};
use crate::stream::StateStream;
use crate::sync::{RemoteStore, SyncController};

/// Owner of one session's state.
///
/// Consumers get [`StoreHandle`]s from [`handle()`](Self::handle). Once
/// the context is shut down those handles fail with
/// [`CoreError::StoreUnavailable`].
pub struct AppContext {
    store: Store,
    identity: Identity,
    sync: SyncController,
}

impl AppContext {
    pub fn new(remote: Arc<dyn RemoteStore>, identity: Identity, config: SyncConfig) -> Self {
        let store = Store::new();
        let sync = SyncController::new(store.clone(), remote, identity.clone(), config);
        Self {
            store,
            identity,
            sync,
        }
    }

    /// Construct and start syncing in one step.
    pub async fn start(
        remote: Arc<dyn RemoteStore>,
        identity: Identity,
        config: SyncConfig,
    ) -> Self {
        let ctx = Self::new(remote, identity, config);
        ctx.sync.start().await;
        ctx
    }

    pub fn handle(&self) -> StoreHandle {
        self.store.handle()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn sync(&self) -> &SyncController {
        &self.sync
    }

    pub fn subscribe(&self) -> StateStream {
        self.store.subscribe()
    }

    /// Wait until no reload is in progress and return that snapshot.
    ///
    /// Only meaningful while someone is signed in: the signed-out state
    /// stays loading.
    pub async fn loaded(&self) -> Result<Arc<AppState>, CoreError> {
        self.store
            .subscribe()
            .wait_for(|state| !state.is_loading)
            .await
            .ok_or(CoreError::StoreUnavailable)
    }

    /// Stop syncing and release the store.
    pub async fn shutdown(self) {
        self.sync.shutdown().await;
        debug!("app context torn down");
    }
}
