//! Memory tiers for ByteBond.
//!
//! - [`embedder`]: text-to-vector conversion, boxed as [`box_embedder::BoxEmbedder`]
//! - [`vector`]: long-term semantic memory, boxed as [`box_vector::BoxMemoryIndex`]
//! - [`short_term`]: the rolling per-user conversation window
//! - [`similarity`]: cosine scoring and ranking shared by in-process indexes

pub mod box_embedder;
pub mod box_vector;
pub mod embedder;
pub mod short_term;
pub mod similarity;
pub mod vector;
