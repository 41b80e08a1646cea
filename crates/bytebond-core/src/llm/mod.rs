//! Generation layer for ByteBond.
//!
//! Contains the [`backend::GenerationBackend`] trait that text generators
//! implement, the [`box_backend::BoxGenerationBackend`] wrapper for dynamic
//! dispatch, the [`retry::BackoffPolicy`] used between attempts, and the
//! [`client::GenerationClient`] that ties them into a bounded retry loop.

pub mod backend;
pub mod box_backend;
pub mod client;
pub mod retry;
