//! Redis cache backend implementation.
//!
//! Provides a shared cache for multi-instance deployments, with TTLs
//! enforced by Redis itself.

mod cache;
mod error;

pub use cache::RedisCache;
