//! # Cache Messages
//!
//! Requests sent from a [`ResourceClient`](crate::framework::ResourceClient) to the
//! [`CacheActor`](crate::framework::CacheActor), one variant per operation, each
//! carrying a oneshot channel for the reply.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::framework::{CacheError, Resource};

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, CacheError>>;

/// Loading/error flags for the cached collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStatus {
    /// A fetch is running and there is no data yet.
    pub is_loading: bool,
    pub is_fetching: bool,
    /// The next `list` will go to the network.
    pub is_stale: bool,
    /// Message of the last failed fetch, cleared by the next successful one.
    pub error: Option<String>,
    /// Size of the current snapshot, if one has been fetched.
    pub record_count: Option<usize>,
    pub pending_mutations: usize,
}

/// Message type sent to the cache actor.
///
/// Reads (`List`, `Get`) are served from the snapshot when it is fresh.
/// Writes (`Create`, `Update`, `Delete`) always go to the remote and
/// invalidate the snapshot when they succeed.
#[derive(Debug)]
pub enum CacheRequest<T: Resource> {
    List {
        respond_to: Response<Arc<Vec<T>>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    Create {
        params: T::Create,
        cancel: CancellationToken,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        cancel: CancellationToken,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        cancel: CancellationToken,
        respond_to: Response<T::Id>,
    },
    Invalidate,
    Status {
        respond_to: oneshot::Sender<QueryStatus>,
    },
}
