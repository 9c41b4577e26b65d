//! Entity storage for Fintrack.
//!
//! This crate provides the storage abstraction for users, categories,
//! transactions, and budgets. It ships a SQLite implementation for the
//! server and an in-memory implementation for tests.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
