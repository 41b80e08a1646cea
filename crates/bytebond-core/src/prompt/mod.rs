//! Prompt assembly for companion turns.

pub mod assembler;
