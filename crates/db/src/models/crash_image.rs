//! Crash image model and DTOs.

use crashwatch_core::crash::CrashSummary;
use crashwatch_core::types::DbId;
use serde::Deserialize;
use sqlx::FromRow;

/// The projection columns of a `crash_images` row (everything but `image`).
#[derive(Debug, Clone, FromRow)]
pub struct CrashImageRow {
    pub camera_id: DbId,
    pub frame_id: DbId,
    pub city: Option<String>,
    pub district: Option<String>,
    pub crash_time: Option<String>,
}

impl From<CrashImageRow> for CrashSummary {
    fn from(row: CrashImageRow) -> Self {
        Self {
            camera_id: row.camera_id,
            frame_id: row.frame_id,
            city: row.city,
            district: row.district,
            crash_time: row.crash_time,
        }
    }
}

/// DTO for writing a crash snapshot. Used by ingestion, never by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCrashImage {
    pub camera_id: DbId,
    pub frame_id: DbId,
    pub city: Option<String>,
    pub district: Option<String>,
    pub crash_time: Option<String>,
    pub image: Option<Vec<u8>>,
}
