//! Terminal client for the crash query service.
//!
//! Polls the latest crash, keeps the full crash list in a client-side
//! store for filtering and charting, and prints the dashboard panels.

pub mod api;
pub mod backoff;
pub mod cli;
pub mod poller;
pub mod render;
pub mod review;
pub mod source;
pub mod store;
