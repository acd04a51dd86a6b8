use crate::framework::{CacheError, QueryStatus, Resource, ResourceClient};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// Implementors only provide [`inner`](CachedClient::inner); listing, fetching
/// one record, invalidation and status come for free.
#[async_trait]
pub trait CachedClient<T: Resource>: Send + Sync {
    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// All records, from the snapshot when it is fresh.
    #[tracing::instrument(skip(self), fields(entity_type = T::NAME))]
    async fn list(&self) -> Result<Arc<Vec<T>>, CacheError> {
        tracing::debug!("Sending request");
        self.inner().list().await
    }

    /// Fetch a record by ID.
    #[tracing::instrument(skip(self), fields(entity_type = T::NAME))]
    async fn get(&self, id: T::Id) -> Result<T, CacheError> {
        tracing::debug!("Sending request");
        self.inner().get(id).await
    }

    async fn invalidate(&self) -> Result<(), CacheError> {
        self.inner().invalidate().await
    }

    async fn status(&self) -> Result<QueryStatus, CacheError> {
        self.inner().status().await
    }
}
