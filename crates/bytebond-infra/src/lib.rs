//! Infrastructure layer for ByteBond.
//!
//! Contains implementations of the port traits defined in `bytebond-core`:
//! the Gemini generation backend and embedder, a local hashing embedder,
//! in-process short-term and long-term memory stores, a TOML-file profile
//! provider, plus configuration loading and secret lookup.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod memory;
pub mod profile;
pub mod secret;
