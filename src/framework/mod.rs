//! Generic snapshot cache over a remote collection.
//!
//! This module provides the building blocks for keeping an in-memory copy of
//! "all records" of a remote resource and mutating it through the network.
//!
//! # Main Components
//!
//! - [`Resource`] - Trait that record types implement to be cached
//! - [`RemoteSource`] - The network seam, one outbound call per operation
//! - [`CacheActor`] - Actor that owns the snapshot and runs remote calls
//! - [`ResourceClient`] - Type-safe handle for sending requests to the actor
//! - [`CacheError`] - Errors a caller can see
//!
//! # Testing
//!
//! See [`mock`] module for an in-memory [`RemoteSource`] with expectation tracking.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod remote;
pub mod resource;

// Re-export core types for convenience
pub use actor::CacheActor;
pub use client::{MutationHandle, ResourceClient};
pub use error::CacheError;
pub use message::{CacheRequest, QueryStatus, Response};
pub use remote::{ApiResponse, RemoteSource};
pub use resource::Resource;
