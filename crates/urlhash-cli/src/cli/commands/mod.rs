//! CLI command handlers.

pub(crate) mod hash;

pub use hash::run_hash;
