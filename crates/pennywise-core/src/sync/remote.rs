// ── Remote document store seam ──
//
// The sync controller only needs three operations from the remote side.
// `DocumentClient` is the production backend; `MemoryRemote` serves tests
// and offline sessions.

use async_trait::async_trait;
use tracing::trace;

use pennywise_api::{Collection, DocumentClient, Fields, RawDocument};

use super::document::OWNER_FIELD;
use crate::error::CoreError;
use crate::model::OwnerId;

/// Per-user document storage, one collection per entity kind.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Write `fields` under `id`, merging with any existing document.
    async fn upsert(&self, collection: Collection, id: &str, fields: Fields)
    -> Result<(), CoreError>;

    /// Every document of `collection` stamped with `owner`.
    async fn query_by_owner(
        &self,
        collection: Collection,
        owner: &OwnerId,
    ) -> Result<Vec<RawDocument>, CoreError>;

    /// Remove the document `id`. Removing a missing document succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl RemoteStore for DocumentClient {
    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), CoreError> {
        trace!(%collection, id, "upsert");
        self.set_document(collection, id, &fields, true).await?;
        Ok(())
    }

    async fn query_by_owner(
        &self,
        collection: Collection,
        owner: &OwnerId,
    ) -> Result<Vec<RawDocument>, CoreError> {
        Ok(self
            .query_documents(collection, OWNER_FIELD, owner.as_str())
            .await?)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), CoreError> {
        self.delete_document(collection, id).await?;
        Ok(())
    }
}
