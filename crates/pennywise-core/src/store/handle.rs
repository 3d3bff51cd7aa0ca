use std::sync::{Arc, Weak};

use super::app_store::StoreInner;
use crate::action::Action;
use crate::error::CoreError;
use crate::state::AppState;

/// Consumer-side access to a [`Store`](super::Store): read the snapshot
/// and dispatch actions.
///
/// The handle does not keep the store alive. Once the owning context is
/// torn down every call fails with [`CoreError::StoreUnavailable`].
#[derive(Clone)]
pub struct StoreHandle {
    inner: Weak<StoreInner>,
}

impl StoreHandle {
    pub(crate) fn new(inner: Weak<StoreInner>) -> Self {
        Self { inner }
    }

    fn upgrade(&self) -> Result<Arc<StoreInner>, CoreError> {
        self.inner.upgrade().ok_or(CoreError::StoreUnavailable)
    }

    pub fn state(&self) -> Result<Arc<AppState>, CoreError> {
        Ok(self.upgrade()?.state())
    }

    pub fn dispatch(&self, action: Action) -> Result<(), CoreError> {
        self.upgrade()?.dispatch(action);
        Ok(())
    }

    /// Whether the backing store still exists.
    pub fn is_available(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
