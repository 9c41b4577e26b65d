//! Core entity definitions for Fintrack.
//!
//! This crate defines the data types shared across the Fintrack backend:
//! users, categories, transactions, and budgets.

mod budget;
mod category;
mod transaction;
mod user;

pub use budget::*;
pub use category::*;
pub use transaction::*;
pub use user::*;
