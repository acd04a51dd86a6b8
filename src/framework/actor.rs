//! # Snapshot Cache Actor
//!
//! This module defines the `CacheActor`, the component that owns the in-memory
//! snapshot of a remote collection. It implements the "Server" side of the
//! actor model: requests arrive on a channel and are handled one at a time, so
//! the snapshot needs no locks.
//!
//! Remote calls never run inside the message loop. They are spawned as tasks
//! that report back through a second, internal channel, which keeps reads and
//! writes from blocking each other and lets several mutations be in flight at
//! once.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::framework::{
    CacheError, CacheRequest, QueryStatus, RemoteSource, Resource, ResourceClient, Response,
};

/// Completion reports from spawned remote calls back to the actor.
enum Settled<T: Resource> {
    Fetched {
        generation: u64,
        result: Result<Vec<T>, String>,
    },
    Created {
        result: Result<T, CacheError>,
        respond_to: Response<T>,
    },
    Updated {
        id: T::Id,
        result: Result<T, CacheError>,
        respond_to: Response<T>,
    },
    Deleted {
        id: T::Id,
        result: Result<(), CacheError>,
        respond_to: Response<T::Id>,
    },
}

/// The actor that caches "all records" of one remote resource.
///
/// # Snapshot rules
///
/// * **List**: a fresh snapshot is returned as-is. Otherwise the caller joins
///   the fetch in flight, or a new fetch is started. Concurrent lists share a
///   single network call.
/// * **Writes**: on success the snapshot is invalidated *before* the caller is
///   answered, so the caller's next list re-fetches. On failure the snapshot
///   is left untouched.
/// * **Invalidation during a fetch**: every invalidation bumps a generation
///   counter. A fetch that completes under an older generation is discarded
///   and, if callers are still waiting, a new fetch is started.
///
/// # Usage
///
/// ```rust,ignore
/// let (actor, client) = CacheActor::new(RestaurantApi::new(&config)?, 32);
/// tokio::spawn(actor.run());
/// let all = client.list().await?;
/// ```
pub struct CacheActor<T: Resource, R: RemoteSource<T>> {
    receiver: mpsc::Receiver<CacheRequest<T>>,
    settled_tx: mpsc::UnboundedSender<Settled<T>>,
    settled_rx: mpsc::UnboundedReceiver<Settled<T>>,
    remote: Arc<R>,
    snapshot: Option<Arc<Vec<T>>>,
    stale: bool,
    generation: u64,
    fetching: bool,
    waiters: Vec<Response<Arc<Vec<T>>>>,
    error: Option<String>,
    in_flight: usize,
    pending_mutations: usize,
}

impl<T: Resource, R: RemoteSource<T>> CacheActor<T, R> {
    /// Creates a new `CacheActor` over `remote` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full,
    /// client calls wait for space.
    pub fn new(remote: R, buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            settled_tx,
            settled_rx,
            remote: Arc::new(remote),
            snapshot: None,
            stale: false,
            generation: 0,
            fetching: false,
            waiters: Vec::new(),
            error: None,
            in_flight: 0,
            pending_mutations: 0,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the message loop until every client handle has been dropped, then
    /// waits for in-flight remote calls so their callers still get answers.
    pub async fn run(mut self) {
        let entity_type = T::NAME;
        info!(entity_type, "Actor started");

        loop {
            tokio::select! {
                biased;
                Some(settled) = self.settled_rx.recv() => self.on_settled(settled),
                request = self.receiver.recv() => match request {
                    Some(request) => self.on_request(request),
                    None => break,
                },
            }
        }

        while self.in_flight > 0 {
            match self.settled_rx.recv().await {
                Some(settled) => self.on_settled(settled),
                None => break,
            }
        }

        let size = self.snapshot.as_ref().map_or(0, |s| s.len());
        info!(entity_type, size, "Shutdown");
    }

    fn fresh_snapshot(&self) -> Option<Arc<Vec<T>>> {
        if self.stale {
            None
        } else {
            self.snapshot.clone()
        }
    }

    fn status(&self) -> QueryStatus {
        QueryStatus {
            is_loading: self.fetching && self.snapshot.is_none(),
            is_fetching: self.fetching,
            is_stale: self.stale || self.snapshot.is_none(),
            error: self.error.clone(),
            record_count: self.snapshot.as_ref().map(|s| s.len()),
            pending_mutations: self.pending_mutations,
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.stale = true;
        debug!(entity_type = T::NAME, generation = self.generation, "Invalidated");
    }

    fn on_request(&mut self, request: CacheRequest<T>) {
        let entity_type = T::NAME;
        match request {
            CacheRequest::List { respond_to } => match self.fresh_snapshot() {
                Some(snapshot) => {
                    debug!(entity_type, size = snapshot.len(), "List (cached)");
                    let _ = respond_to.send(Ok(snapshot));
                }
                None => {
                    self.waiters.push(respond_to);
                    if self.fetching {
                        debug!(entity_type, waiters = self.waiters.len(), "List joined fetch");
                    } else {
                        self.start_fetch();
                    }
                }
            },
            CacheRequest::Get { id, respond_to } => {
                let cached = self
                    .fresh_snapshot()
                    .and_then(|snapshot| snapshot.iter().find(|r| r.id() == id).cloned());
                if let Some(record) = cached {
                    debug!(entity_type, %id, "Get (cached)");
                    let _ = respond_to.send(Ok(record));
                    return;
                }
                debug!(entity_type, %id, "Get");
                let remote = Arc::clone(&self.remote);
                tokio::spawn(async move {
                    let fallback = format!("Failed to fetch {}", T::NAME);
                    let result = remote
                        .get_one(id)
                        .await
                        .into_result(&fallback)
                        .map_err(CacheError::Remote);
                    let _ = respond_to.send(result);
                });
            }
            CacheRequest::Create {
                params,
                cancel,
                respond_to,
            } => {
                debug!(entity_type, ?params, "Create");
                self.begin_mutation();
                let remote = Arc::clone(&self.remote);
                let settled = self.settled_tx.clone();
                tokio::spawn(async move {
                    let fallback = format!("Failed to create {}", T::NAME);
                    let result = tokio::select! {
                        response = remote.create(params) => {
                            response.into_result(&fallback).map_err(CacheError::Remote)
                        }
                        _ = cancel.cancelled() => Err(CacheError::Cancelled),
                    };
                    let _ = settled.send(Settled::Created { result, respond_to });
                });
            }
            CacheRequest::Update {
                id,
                update,
                cancel,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                self.begin_mutation();
                let remote = Arc::clone(&self.remote);
                let settled = self.settled_tx.clone();
                tokio::spawn(async move {
                    let fallback = format!("Failed to update {}", T::NAME);
                    let result = tokio::select! {
                        response = remote.update(id, update) => {
                            response.into_result(&fallback).map_err(CacheError::Remote)
                        }
                        _ = cancel.cancelled() => Err(CacheError::Cancelled),
                    };
                    let _ = settled.send(Settled::Updated {
                        id,
                        result,
                        respond_to,
                    });
                });
            }
            CacheRequest::Delete {
                id,
                cancel,
                respond_to,
            } => {
                debug!(entity_type, %id, "Delete");
                self.begin_mutation();
                let remote = Arc::clone(&self.remote);
                let settled = self.settled_tx.clone();
                tokio::spawn(async move {
                    let fallback = format!("Failed to delete {}", T::NAME);
                    let result = tokio::select! {
                        response = remote.delete(id) => {
                            response.into_unit_result(&fallback).map_err(CacheError::Remote)
                        }
                        _ = cancel.cancelled() => Err(CacheError::Cancelled),
                    };
                    let _ = settled.send(Settled::Deleted {
                        id,
                        result,
                        respond_to,
                    });
                });
            }
            CacheRequest::Invalidate => self.invalidate(),
            CacheRequest::Status { respond_to } => {
                let _ = respond_to.send(self.status());
            }
        }
    }

    fn on_settled(&mut self, settled: Settled<T>) {
        match settled {
            Settled::Fetched { generation, result } => self.finish_fetch(generation, result),
            Settled::Created { result, respond_to } => {
                let id = result.as_ref().ok().map(|r| r.id());
                self.finish_mutation("Create", id, result.as_ref().err());
                let _ = respond_to.send(result);
            }
            Settled::Updated {
                id,
                result,
                respond_to,
            } => {
                self.finish_mutation("Update", Some(id), result.as_ref().err());
                let _ = respond_to.send(result);
            }
            Settled::Deleted {
                id,
                result,
                respond_to,
            } => {
                self.finish_mutation("Delete", Some(id), result.as_ref().err());
                let _ = respond_to.send(result.map(|()| id));
            }
        }
    }

    fn start_fetch(&mut self) {
        self.fetching = true;
        self.in_flight += 1;
        let generation = self.generation;
        debug!(entity_type = T::NAME, generation, "Fetching");

        let remote = Arc::clone(&self.remote);
        let settled = self.settled_tx.clone();
        tokio::spawn(async move {
            let fallback = format!("Failed to fetch {}s", T::NAME);
            let result = remote.list_all().await.into_result(&fallback);
            let _ = settled.send(Settled::Fetched { generation, result });
        });
    }

    fn finish_fetch(&mut self, generation: u64, result: Result<Vec<T>, String>) {
        let entity_type = T::NAME;
        self.in_flight -= 1;
        self.fetching = false;

        if generation != self.generation {
            debug!(entity_type, generation, current = self.generation, "Discarding superseded fetch");
            if !self.waiters.is_empty() {
                self.start_fetch();
            }
            return;
        }

        match result {
            Ok(records) => {
                let snapshot = Arc::new(records);
                info!(entity_type, size = snapshot.len(), waiters = self.waiters.len(), "Fetched");
                self.snapshot = Some(Arc::clone(&snapshot));
                self.stale = false;
                self.error = None;
                for waiter in self.waiters.drain(..) {
                    let _ = waiter.send(Ok(Arc::clone(&snapshot)));
                }
            }
            Err(error) => {
                warn!(entity_type, %error, "Fetch failed");
                self.error = Some(error.clone());
                for waiter in self.waiters.drain(..) {
                    let _ = waiter.send(Err(CacheError::Remote(error.clone())));
                }
            }
        }
    }

    fn begin_mutation(&mut self) {
        self.in_flight += 1;
        self.pending_mutations += 1;
    }

    fn finish_mutation(&mut self, op: &'static str, id: Option<T::Id>, error: Option<&CacheError>) {
        let entity_type = T::NAME;
        self.in_flight -= 1;
        self.pending_mutations -= 1;
        match error {
            None => {
                info!(entity_type, op, id = ?id, "Mutation ok");
                self.invalidate();
            }
            // The request may or may not have reached the server.
            Some(CacheError::Cancelled) => {
                warn!(entity_type, op, id = ?id, "Mutation cancelled");
                self.invalidate();
            }
            Some(error) => {
                warn!(entity_type, op, id = ?id, %error, "Mutation failed");
            }
        }
    }
}
