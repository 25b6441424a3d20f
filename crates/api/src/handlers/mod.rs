//! Request handlers.
//!
//! Handlers delegate to the repositories in `crashwatch_db` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod crash;
