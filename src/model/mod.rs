//! Restaurant data structures (DTOs) and their [`Resource`](crate::framework::Resource) implementation.

pub mod restaurant;

pub use restaurant::*;
