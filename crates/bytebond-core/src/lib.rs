//! Memory-augmented response orchestration for ByteBond.
//!
//! This crate defines the "ports" (embedder, memory stores, profile
//! provider, generation backend) that the infrastructure layer implements,
//! plus the logic that composes them into a turn: the retrying
//! generation client, the prompt assembler, and the response orchestrator.
//! It depends only on `bytebond-types` -- never on `bytebond-infra`.

pub mod llm;
pub mod memory;
pub mod orchestrator;
pub mod profile;
pub mod prompt;
