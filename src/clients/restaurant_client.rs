use crate::clients::cached_client::CachedClient;
use async_trait::async_trait;
use crate::framework::{CacheError, MutationHandle, ResourceClient};
use crate::model::{RestaurantDraft, RestaurantId, RestaurantPatch, RestaurantRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Client for the restaurant cache.
///
/// Reads come from [`CachedClient`]; writes are named after what they do to a
/// restaurant and exist in a blocking form (`create_restaurant`) and a
/// background form (`spawn_create`) that the UI polls for a pending state.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<RestaurantRecord>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<RestaurantRecord>) -> Self {
        Self { inner }
    }

    /// A client whose calls are abandoned once `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            inner: self.inner.with_cancellation(cancel),
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn create_restaurant(
        &self,
        draft: RestaurantDraft,
    ) -> Result<RestaurantRecord, CacheError> {
        debug!(?draft, "create_restaurant called");
        self.inner.create(draft).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<RestaurantRecord, CacheError> {
        debug!(?patch, "update_restaurant called");
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: RestaurantId) -> Result<RestaurantId, CacheError> {
        debug!("delete_restaurant called");
        self.inner.delete(id).await
    }

    pub fn spawn_create(&self, draft: RestaurantDraft) -> MutationHandle<RestaurantRecord> {
        debug!(?draft, "Spawning create");
        self.inner.spawn_create(draft)
    }

    pub fn spawn_update(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> MutationHandle<RestaurantRecord> {
        debug!(%id, ?patch, "Spawning update");
        self.inner.spawn_update(id, patch)
    }

    pub fn spawn_delete(&self, id: RestaurantId) -> MutationHandle<RestaurantId> {
        debug!(%id, "Spawning delete");
        self.inner.spawn_delete(id)
    }
}

#[async_trait]
impl CachedClient<RestaurantRecord> for RestaurantClient {
    fn inner(&self) -> &ResourceClient<RestaurantRecord> {
        &self.inner
    }
}
