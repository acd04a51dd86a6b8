//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the client and the CLI.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate,
//! providing hierarchical spans that show the complete request flow through the system.
//!
//! ## Configuration
//!
//! The framework uses a compact format that hides the crate/module prefix (`with_target(false)`).
//! This keeps log lines short while still providing rich structured data.
//!
//! - **Structured logging** with `tracing` crate
//! - **Hierarchical spans** for request tracing
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** optimized for development
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: Startup, shutdown, and final snapshot size
//! - **Cache Operations**: Fetches (with record counts), cache hits, invalidations
//! - **Mutations**: Create, Update, Delete with ids, failures at `warn`
//! - **HTTP Calls**: One `api` span per request with its method and id
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info restaurants list
//!
//! # Show full payloads with debug logs
//! RUST_LOG=debug restaurants add --name Tako ...
//!
//! # Filter to specific modules
//! RUST_LOG=restaurant_list::framework=debug restaurants list
//! ```
//!
//! ## Debug Flag for Full Payload
//!
//! When you run with `RUST_LOG=debug`, client calls log full payloads **once** at the start:
//!
//! ```rust,ignore
//! debug!(?draft, "create_restaurant called");
//! ```
//!
//! The `?` syntax records the variable using its `Debug` representation as a
//! structured field.
//!
//! ## Workflow Trace Example
//!
//! Deleting a restaurant from the list, **with `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG Confirmation opened kind=Delete title=Delete Restaurant
//! DEBUG Confirmed action=DeleteRestaurant { id: RestaurantId(3), name: "Tako" }
//! DEBUG Delete entity_type="restaurant" id=3
//! DEBUG api: Response status=204 method="DELETE" id=3
//! INFO Mutation ok entity_type="restaurant" op="Delete" id=Some(RestaurantId(3))
//! DEBUG Invalidated entity_type="restaurant" generation=2
//! INFO Restaurant deleted id=3
//! DEBUG Fetching entity_type="restaurant" generation=2
//! INFO Fetched entity_type="restaurant" size=6 waiters=1
//! ```
//!
//! The actor logs `entity_type` instead of a module path, so log lines stay
//! short while remaining filterable.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact() // Compact format shows spans inline (e.g., "api:Response")
        .init();
}
