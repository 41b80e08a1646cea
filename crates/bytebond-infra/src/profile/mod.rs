//! Profile provider adapters.

pub mod file;

pub use file::FileProfileProvider;
