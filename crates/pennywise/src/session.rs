//! One signed-in session against the document service.
//!
//! Opens an [`AppContext`], waits for the initial reload, and turns sync
//! outcomes into CLI errors. Every data command runs inside a session.

use std::sync::Arc;

use tracing::debug;

use pennywise_api::DocumentClient;
use pennywise_core::{
    Action, AppContext, AppState, CoreError, Identity, MemoryRemote, PersistOutcome, RemoteStore,
    SyncController,
};

use crate::config::SessionConfig;
use crate::error::CliError;

pub struct Session {
    ctx: AppContext,
    currency: String,
}

impl Session {
    /// Connect, sign in and wait until the owner's data is loaded.
    pub async fn open(config: SessionConfig) -> Result<Self, CliError> {
        let remote: Arc<dyn RemoteStore> = match config.service {
            Some(ref service) => {
                debug!(url = %service.base_url, owner = %config.owner, "opening remote session");
                let client = DocumentClient::new(service.base_url.clone(), &service.transport)
                    .map_err(CoreError::from)?;
                Arc::new(client)
            }
            None => {
                debug!(owner = %config.owner, "opening offline session");
                Arc::new(MemoryRemote::new())
            }
        };

        let identity = Identity::signed_in(config.owner);
        let ctx = AppContext::start(remote, identity, config.sync).await;
        let state = ctx.loaded().await?;

        if let Some(message) = state.error.clone() {
            ctx.shutdown().await;
            return Err(CliError::LoadFailed { message });
        }

        Ok(Self {
            ctx,
            currency: config.currency,
        })
    }

    pub fn state(&self) -> Result<Arc<AppState>, CliError> {
        Ok(self.ctx.handle().state()?)
    }

    pub fn dispatch(&self, action: Action) -> Result<(), CliError> {
        Ok(self.ctx.handle().dispatch(action)?)
    }

    pub fn sync(&self) -> &SyncController {
        self.ctx.sync()
    }

    /// Currency assigned to accounts created without one.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Write everything back now and surface a failed save.
    pub async fn commit(&self) -> Result<usize, CliError> {
        match self.ctx.sync().flush().await {
            PersistOutcome::Written(n) => {
                debug!(documents = n, "changes committed");
                Ok(n)
            }
            PersistOutcome::SkippedSignedOut => Err(CliError::NoUser),
            PersistOutcome::SkippedOwnerChanged => Err(CoreError::OwnerChanged.into()),
            PersistOutcome::SkippedLoading
            | PersistOutcome::SkippedErrored
            | PersistOutcome::Failed => {
                let message = self
                    .state()?
                    .error
                    .clone()
                    .unwrap_or_else(|| self.ctx.sync().config().save_error_message.clone());
                Err(CliError::SaveFailed { message })
            }
        }
    }

    pub async fn close(self) {
        self.ctx.shutdown().await;
    }
}
