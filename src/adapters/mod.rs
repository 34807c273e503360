//! Adapters for the port traits.

pub mod backends;
pub mod cache;
