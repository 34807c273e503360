//! Caching adapters.

pub mod generation_cache;

pub use generation_cache::{CacheKey, CacheLookup, GenerationCache};
