/// Camera and frame identifiers are SQLite INTEGERs.
pub type DbId = i64;

/// Wall-clock time as stored in the `crash_time` column (no offset).
pub type LocalTimestamp = chrono::NaiveDateTime;
