//! # Application Lifecycle
//!
//! Starting the cache actor, driving the screen state, and shutting down.
//!
//! The [`RestaurantApp`] is the "conductor": it spawns a
//! [`CacheActor`](crate::framework::CacheActor) over the HTTP API, owns the
//! [`UiState`], and turns user intents (open form, submit, confirm delete,
//! change page) into cache calls and state transitions.
//!
//! **Key Responsibilities:**
//! 1. **Actor Creation** - Build the API client and spawn the cache actor
//! 2. **Workflow** - Route submits to create/update and chain confirmations
//! 3. **Graceful Shutdown** - Cancel outstanding calls and await the actor
//! 4. **Observability Setup** - See [`setup_tracing`]

pub mod app;
pub mod tracing;

pub use app::{AppError, RestaurantApp, UiState};
pub use self::tracing::setup_tracing;
