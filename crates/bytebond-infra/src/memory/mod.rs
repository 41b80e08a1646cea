//! In-process memory adapters.
//!
//! - [`short_term::InMemoryShortTermStore`]: bounded per-user turn windows
//! - [`vector::InMemoryMemoryIndex`]: cosine-ranked long-term memory with an
//!   optional append-only JSON-lines journal
//! - [`hashing::HashingEmbedder`]: deterministic local embeddings

pub mod hashing;
pub mod short_term;
pub mod vector;
