//! Repository for the `crash_images` table.

use crashwatch_core::crash::{CrashKey, CrashSummary};
use sqlx::SqlitePool;

use crate::models::crash_image::{CrashImageRow, NewCrashImage};

/// Projection columns shared across queries. The `image` blob is only read
/// by [`CrashRepo::find_image`].
const COLUMNS: &str = "camera_id, frame_id, city, district, crash_time";

/// Read queries for crash records, plus the ingestion upsert.
pub struct CrashRepo;

impl CrashRepo {
    /// List every crash, most recent first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<CrashSummary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM crash_images ORDER BY crash_time DESC");
        let rows = sqlx::query_as::<_, CrashImageRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CrashSummary::from).collect())
    }

    /// The crash with the greatest `crash_time`, if any.
    pub async fn find_latest(pool: &SqlitePool) -> Result<Option<CrashSummary>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM crash_images ORDER BY crash_time DESC LIMIT 1");
        let row = sqlx::query_as::<_, CrashImageRow>(&query)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CrashSummary::from))
    }

    /// Find a crash by its `(camera_id, frame_id)` identity.
    pub async fn find_by_key(
        pool: &SqlitePool,
        key: CrashKey,
    ) -> Result<Option<CrashSummary>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM crash_images WHERE camera_id = ? AND frame_id = ?");
        let row = sqlx::query_as::<_, CrashImageRow>(&query)
            .bind(key.camera_id)
            .bind(key.frame_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CrashSummary::from))
    }

    /// The stored JPEG payload for a crash.
    ///
    /// Returns `None` when the row is missing or its `image` is NULL or empty.
    pub async fn find_image(
        pool: &SqlitePool,
        key: CrashKey,
    ) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let image = sqlx::query_scalar::<_, Option<Vec<u8>>>(
            "SELECT image FROM crash_images WHERE camera_id = ? AND frame_id = ?",
        )
        .bind(key.camera_id)
        .bind(key.frame_id)
        .fetch_optional(pool)
        .await?;
        Ok(image.flatten().filter(|bytes| !bytes.is_empty()))
    }

    /// Insert a crash snapshot, replacing any existing row with the same
    /// identity (last write wins).
    pub async fn upsert(pool: &SqlitePool, input: &NewCrashImage) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO crash_images (camera_id, frame_id, city, district, crash_time, image)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (camera_id, frame_id) DO UPDATE SET
                city = excluded.city,
                district = excluded.district,
                crash_time = excluded.crash_time,
                image = excluded.image",
        )
        .bind(input.camera_id)
        .bind(input.frame_id)
        .bind(&input.city)
        .bind(&input.district)
        .bind(&input.crash_time)
        .bind(&input.image)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Number of stored crashes.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM crash_images")
            .fetch_one(pool)
            .await
    }
}
