// ── Reactive application store ──
//
// Holds the current `AppState` in a `watch` channel. Every dispatch runs
// the reducer synchronously under the channel's write lock, so
// concurrent dispatches are serialized and never interleave.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::handle::StoreHandle;
use crate::action::Action;
use crate::reducer::reduce;
use crate::state::AppState;
use crate::stream::StateStream;

/// The container for the canonical snapshot.
///
/// Cheaply cloneable; all clones share the same snapshot. Consumers that
/// must not keep the store alive hold a [`StoreHandle`] instead.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

pub(crate) struct StoreInner {
    state: watch::Sender<Arc<AppState>>,
}

impl StoreInner {
    pub(crate) fn dispatch(&self, action: Action) {
        self.dispatch_unless_cancelled(None, action);
    }

    /// Checking `token` under the channel's write lock orders this
    /// dispatch against whatever cancelled it: once `cancel()` has
    /// returned, the action can no longer land.
    fn dispatch_unless_cancelled(
        &self,
        token: Option<&CancellationToken>,
        action: Action,
    ) -> bool {
        let name = action.name();
        let mut dropped = false;
        let changed = self.state.send_if_modified(|current| {
            if token.is_some_and(CancellationToken::is_cancelled) {
                dropped = true;
                return false;
            }
            let next = reduce(current, action);
            if next.same_as(current) {
                return false;
            }
            *current = Arc::new(next);
            true
        });
        trace!(action = name, changed, dropped, "dispatched");
        !dropped
    }

    pub(crate) fn state(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }
}

impl Store {
    /// A store holding the initial (empty, loading) state.
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (tx, _) = watch::channel(Arc::new(state));
        Self {
            inner: Arc::new(StoreInner { state: tx }),
        }
    }

    /// Apply `action` to the current snapshot.
    ///
    /// Subscribers are only notified when the snapshot actually changed.
    pub fn dispatch(&self, action: Action) {
        self.inner.dispatch(action);
    }

    /// Apply `action` only while `token` is live. Returns `false` when
    /// the action was dropped because the token had been cancelled.
    pub(crate) fn dispatch_if_live(&self, token: &CancellationToken, action: Action) -> bool {
        self.inner.dispatch_unless_cancelled(Some(token), action)
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<AppState> {
        self.inner.state()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.inner.state.subscribe())
    }

    /// A non-owning handle for consumers.
    pub fn handle(&self) -> StoreHandle {
        StoreHandle::new(Arc::downgrade(&self.inner))
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<Arc<AppState>> {
        self.inner.state.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
