//! Secret lookup for backend API keys.

pub mod env;
