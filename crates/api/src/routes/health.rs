use axum::extract::State;
use axum::{routing::get, Json, Router};
use crashwatch_core::crash::TEST_CRASH_KEY;
use crashwatch_db::repositories::CrashRepo;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Stored crash records. Absent when the database is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crashes: Option<i64>,
    /// Whether the record the monitor falls back to is seeded.
    pub test_record: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let crashes = match CrashRepo::count(&state.pool).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the crash store");
            None
        }
    };

    let test_record = match crashes {
        Some(_) => matches!(
            CrashRepo::find_by_key(&state.pool, TEST_CRASH_KEY).await,
            Ok(Some(_))
        ),
        None => false,
    };

    let db_healthy = crashes.is_some();
    Json(HealthReport {
        status: if db_healthy {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        crashes,
        test_record,
    })
}

/// `/health`, mounted beside the `/api` routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
