//! Read-only profile access.

pub mod provider;
