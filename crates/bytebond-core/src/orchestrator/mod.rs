//! Per-turn response orchestration.
//!
//! [`service::ResponseOrchestrator`] runs one turn through the
//! [`stage::TurnStage`] sequence under a per-user [`locks::UserLocks`]
//! guard, reporting exhausted generations to an [`hook::ExhaustionHook`].

pub mod hook;
pub mod locks;
pub mod service;
pub mod stage;
