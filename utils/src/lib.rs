//! Shared filesystem helpers for the bandit crates.
//!
//! Kept apart from `bandit-types` so the domain types stay free of IO.

pub mod atomic_write;

pub use atomic_write::{AtomicWriteOptions, Overwrite, atomic_write_with_options};
