// ── Identity signal ──
//
// The signed-in user as observed by the sync controller. Whatever
// performs authentication feeds this signal; core only reacts to its
// transitions.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::model::OwnerId;

/// Observable "who is signed in" value.
#[derive(Clone)]
pub struct Identity {
    tx: Arc<watch::Sender<Option<OwnerId>>>,
}

impl Identity {
    /// A signal that starts signed out.
    pub fn signed_out() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(owner: OwnerId) -> Self {
        let (tx, _) = watch::channel(Some(owner));
        Self { tx: Arc::new(tx) }
    }

    /// Switch to `owner`. Signing in as the current user is not a
    /// transition and notifies nobody.
    pub fn sign_in(&self, owner: OwnerId) {
        let changed = self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&owner) {
                return false;
            }
            *current = Some(owner);
            true
        });
        debug!(changed, "identity: sign in");
    }

    pub fn sign_out(&self) {
        let changed = self.tx.send_if_modified(|current| current.take().is_some());
        debug!(changed, "identity: sign out");
    }

    pub fn current(&self) -> Option<OwnerId> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<OwnerId>> {
        self.tx.subscribe()
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::signed_out()
    }
}
