//! Functional core for the ecogarden advice board.
//!
//! Pure types and functions only: entities, directive resolution,
//! reconciliation planning, cache key normalization, error taxonomies and
//! the traits the imperative shell implements.

pub mod advice;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod storage;
pub mod weather;
