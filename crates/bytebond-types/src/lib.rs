//! Shared domain types for ByteBond.
//!
//! This crate contains the domain types used across the companion:
//! conversation turns, long-term memory records, user/persona profiles,
//! generation envelopes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod memory;
pub mod profile;
