//! Aggregation and reporting core for Fintrack.
//!
//! Pure, synchronous computations over already-fetched rows: period
//! resolution, per-category spending totals, budget spend tracking with
//! threshold alerts, and income/expense summaries. No I/O happens here;
//! callers fetch collections from the store and pass them in.

mod budget_status;
mod period;
mod spending;
mod summary;

pub use budget_status::*;
pub use period::*;
pub use spending::*;
pub use summary::*;
