//! # Resource Trait
//!
//! The `Resource` trait is the contract a record type implements so a
//! [`CacheActor`](crate::framework::CacheActor) can keep snapshots of it and route
//! mutations for it to a [`RemoteSource`](crate::framework::RemoteSource).
//!
//! Associated types tie each resource to its own payloads: a restaurant cache
//! accepts a `RestaurantDraft` on create and a `RestaurantPatch` on update, and
//! nothing else compiles.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be cached by `CacheActor`.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Server-assigned identifier.
    type Id: Copy + Eq + Hash + Send + Sync + Display + Debug + 'static;

    /// The payload sent to create a new record (no id yet).
    type Create: Send + Sync + Debug + 'static;

    /// The payload sent to update an existing record.
    type Update: Send + Sync + Debug + 'static;

    /// Human-readable singular noun, used in fallback error messages.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
}
