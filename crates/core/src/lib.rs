//! Domain logic for the crash review dashboard.
//!
//! The `core` crate contains no database or HTTP dependencies; records are
//! passed in by the caller (the query service or the monitor client).

pub mod chart;
pub mod crash;
pub mod error;
pub mod filter;
pub mod location;
pub mod snapshot;
pub mod timestamp;
pub mod types;
