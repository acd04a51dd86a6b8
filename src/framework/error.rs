//! # Cache Errors
//!
//! Errors a caller of [`ResourceClient`](crate::framework::ResourceClient) can see.
//! Remote failures arrive already normalized to a message string.

/// Errors that can occur while talking to the cache actor.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("{0}")]
    Remote(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Mutation task failed: {0}")]
    TaskFailed(String),
}
