//! # Generic Client
//!
//! This module defines the handle used to talk to a [`CacheActor`](crate::framework::CacheActor).

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::framework::{CacheError, CacheRequest, QueryStatus, Resource};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type-safe, async API over the cache actor.
/// Every call sends one request over a Tokio mpsc channel and awaits the reply
/// on a oneshot channel.
///
/// * **Cloneable**: holds only a sender and a token, so cloning is inexpensive.
/// * **Cancellable**: a client built with [`with_cancellation`](Self::with_cancellation)
///   stops waiting once its token fires, and the actor abandons any mutation
///   it started on the client's behalf.
#[derive(Clone)]
pub struct ResourceClient<T: Resource> {
    sender: mpsc::Sender<CacheRequest<T>>,
    cancel: CancellationToken,
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<CacheRequest<T>>) -> Self {
        Self {
            sender,
            cancel: CancellationToken::new(),
        }
    }

    /// A handle whose calls are abandoned once `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            sender: self.sender.clone(),
            cancel,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    async fn call<V>(
        &self,
        request: CacheRequest<T>,
        response: oneshot::Receiver<Result<V, CacheError>>,
    ) -> Result<V, CacheError> {
        if self.cancel.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        self.sender
            .send(request)
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        tokio::select! {
            reply = response => reply.map_err(|_| CacheError::ActorDropped)?,
            _ = self.cancel.cancelled() => Err(CacheError::Cancelled),
        }
    }

    /// All records, from the snapshot when it is fresh.
    pub async fn list(&self) -> Result<Arc<Vec<T>>, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.call(CacheRequest::List { respond_to }, response).await
    }

    pub async fn get(&self, id: T::Id) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.call(CacheRequest::Get { id, respond_to }, response).await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        let request = CacheRequest::Create {
            params,
            cancel: self.cancel.clone(),
            respond_to,
        };
        self.call(request, response).await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, CacheError> {
        let (respond_to, response) = oneshot::channel();
        let request = CacheRequest::Update {
            id,
            update,
            cancel: self.cancel.clone(),
            respond_to,
        };
        self.call(request, response).await
    }

    /// Deletes `id` and returns it on success.
    pub async fn delete(&self, id: T::Id) -> Result<T::Id, CacheError> {
        let (respond_to, response) = oneshot::channel();
        let request = CacheRequest::Delete {
            id,
            cancel: self.cancel.clone(),
            respond_to,
        };
        self.call(request, response).await
    }

    /// Marks the snapshot stale; the next `list` goes to the network.
    pub async fn invalidate(&self) -> Result<(), CacheError> {
        self.sender
            .send(CacheRequest::Invalidate)
            .await
            .map_err(|_| CacheError::ActorClosed)
    }

    pub async fn status(&self) -> Result<QueryStatus, CacheError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Status { respond_to })
            .await
            .map_err(|_| CacheError::ActorClosed)?;
        response.await.map_err(|_| CacheError::ActorDropped)
    }

    /// Starts a create in the background.
    pub fn spawn_create(&self, params: T::Create) -> MutationHandle<T> {
        let client = self.clone();
        MutationHandle::spawn(async move { client.create(params).await })
    }

    pub fn spawn_update(&self, id: T::Id, update: T::Update) -> MutationHandle<T> {
        let client = self.clone();
        MutationHandle::spawn(async move { client.update(id, update).await })
    }

    pub fn spawn_delete(&self, id: T::Id) -> MutationHandle<T::Id> {
        let client = self.clone();
        MutationHandle::spawn(async move { client.delete(id).await })
    }
}

/// A mutation running in the background.
///
/// Lets a caller show a pending indicator (`is_pending`) and collect the
/// result later without blocking the thread that started it.
#[derive(Debug)]
pub struct MutationHandle<V> {
    task: JoinHandle<Result<V, CacheError>>,
}

impl<V: Send + 'static> MutationHandle<V> {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<V, CacheError>> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.task.is_finished()
    }

    /// Waits for the mutation to settle.
    pub async fn outcome(self) -> Result<V, CacheError> {
        self.task
            .await
            .unwrap_or_else(|e| Err(CacheError::TaskFailed(e.to_string())))
    }
}
