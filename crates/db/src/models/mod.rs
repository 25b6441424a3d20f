//! Row structs and DTOs.
//!
//! Rows convert into the `crashwatch_core` projection types so callers
//! outside this crate never see `sqlx` derives.

pub mod crash_image;
