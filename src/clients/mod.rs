//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod cached_client;
pub mod restaurant_client;

pub use cached_client::*;
pub use restaurant_client::*;
