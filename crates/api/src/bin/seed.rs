//! Populate the crash database with test crashes.
//!
//! Writes the `9999-1` and `9999-2` records the dashboard falls back to,
//! each with a generated placeholder snapshot. Re-running replaces them.

use anyhow::Context;
use crashwatch_core::crash::{PLACEHOLDER_CITY, TEST_CRASH_KEY};
use crashwatch_core::snapshot::{placeholder_jpeg, PLACEHOLDER_SIZE};
use crashwatch_core::timestamp::STORAGE_FORMAT;
use crashwatch_db::models::crash_image::NewCrashImage;
use crashwatch_db::repositories::CrashRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TEST_FRAMES: &[(i64, &str)] = &[(1, "Test District 1"), (2, "Test District 2")];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crashwatch_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://crash_database.db".into());

    let pool = crashwatch_db::create_pool(&database_url)
        .await
        .with_context(|| format!("failed to open database at {database_url}"))?;
    crashwatch_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let crash_time = chrono::Local::now().format(STORAGE_FORMAT).to_string();
    let (width, height) = PLACEHOLDER_SIZE;

    for &(frame_id, district) in TEST_FRAMES {
        let image = placeholder_jpeg(width, height, frame_id as u32)?;
        let crash = NewCrashImage {
            camera_id: TEST_CRASH_KEY.camera_id,
            frame_id,
            city: Some(PLACEHOLDER_CITY.into()),
            district: Some(district.into()),
            crash_time: Some(crash_time.clone()),
            image: Some(image),
        };

        CrashRepo::upsert(&pool, &crash)
            .await
            .with_context(|| format!("failed to insert test crash {}-{frame_id}", crash.camera_id))?;
        tracing::info!(
            camera_id = crash.camera_id,
            frame_id,
            district,
            "Added test crash"
        );
    }

    let total = CrashRepo::count(&pool).await?;
    tracing::info!(total, "Test data creation completed");

    pool.close().await;
    Ok(())
}
