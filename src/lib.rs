//! # Restaurant List
//!
//! > **A client for a personal restaurant list kept on a REST server.**
//!
//! The crate keeps an in-memory snapshot of every restaurant, validates drafts
//! before they are sent, and drives the add/edit/delete workflow with explicit
//! confirmation prompts. It ships as a library plus the `restaurants` CLI.
//!
//! ## Design
//!
//! ### Snapshot cache as an actor
//! One [`CacheActor`](framework::CacheActor) owns the list of all restaurants.
//! Callers talk to it through a cloneable [`ResourceClient`](framework::ResourceClient):
//! reads are served from the snapshot when fresh, concurrent reads share one
//! fetch, and every successful write invalidates the snapshot before the
//! caller hears back. Remote calls run in spawned tasks, so reads and writes
//! never block each other.
//!
//! ### Validate locally, send typed
//! Raw input is checked against a field contract in [`schema`] and only then
//! becomes a typed [`RestaurantDraft`](model::RestaurantDraft). Edits send a
//! [`RestaurantPatch`](model::RestaurantPatch) of just the changed fields.
//!
//! ### Explicit UI state
//! [`RestaurantApp`](lifecycle::RestaurantApp) owns one [`UiState`](lifecycle::UiState)
//! and changes it only through named actions. Confirmation chaining is a
//! tagged state machine in [`confirm`], not nested callbacks.
//!
//! ### Observability
//! `tracing` everywhere with structured fields; see [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`model`]: the record, draft and patch types with their wire names.
//! - [`schema`]: create/update/read/form validation contracts.
//! - [`framework`]: the generic snapshot cache (`Resource`, `RemoteSource`,
//!   `CacheActor`, `ResourceClient`) and its [`mock`](framework::mock).
//! - [`api`]: the HTTP [`RemoteSource`](framework::RemoteSource) built on `reqwest`.
//! - [`clients`]: the typed [`RestaurantClient`](clients::RestaurantClient).
//! - [`form`], [`list`], [`confirm`]: form controller, pagination and cards,
//!   confirmation prompts.
//! - [`lifecycle`]: the root orchestrator and tracing setup.
//! - [`config`]: base URL and channel sizing, from the environment.
//!
//! ## Quick Start
//!
//! ```bash
//! API_BASE_URL=http://localhost:8000 RUST_LOG=info restaurants list
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod confirm;
pub mod form;
pub mod framework;
pub mod lifecycle;
pub mod list;
pub mod model;
pub mod schema;
