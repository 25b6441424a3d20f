//! Handlers for the `/api/crashes` resource.
//!
//! Every handler is a single read against `crash_images`; the service never
//! writes. Path ids that are not integers cannot match a row, so they are
//! reported as missing rather than rejected.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use crashwatch_core::crash::{CrashKey, CrashSummary, LatestCrash};
use crashwatch_core::snapshot::JPEG_CONTENT_TYPE;
use crashwatch_db::repositories::CrashRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const NO_CRASHES: &str = "No crash records found";
const CRASH_NOT_FOUND: &str = "Crash record not found";
const IMAGE_NOT_FOUND: &str = "Image not found";

/// GET /api/crashes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CrashSummary>>> {
    let crashes = CrashRepo::list(&state.pool).await?;
    Ok(Json(crashes))
}

/// GET /api/crashes/latest
pub async fn latest(State(state): State<AppState>) -> AppResult<Json<LatestCrash>> {
    let crash = CrashRepo::find_latest(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found(NO_CRASHES))?;
    Ok(Json(LatestCrash::from(crash)))
}

/// GET /api/crashes/{camera_id}/{frame_id}
pub async fn get_by_key(
    State(state): State<AppState>,
    Path((camera_id, frame_id)): Path<(String, String)>,
) -> AppResult<Json<CrashSummary>> {
    let key = CrashKey::from_segments(&camera_id, &frame_id)
        .ok_or_else(|| AppError::not_found(CRASH_NOT_FOUND))?;

    let crash = CrashRepo::find_by_key(&state.pool, key)
        .await?
        .ok_or_else(|| AppError::not_found(CRASH_NOT_FOUND))?;
    Ok(Json(crash))
}

/// GET /api/crashes/{camera_id}/{frame_id}/image
///
/// Returns the raw JPEG payload.
pub async fn image(
    State(state): State<AppState>,
    Path((camera_id, frame_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let key = CrashKey::from_segments(&camera_id, &frame_id)
        .ok_or_else(|| AppError::not_found(IMAGE_NOT_FOUND))?;

    let bytes = CrashRepo::find_image(&state.pool, key)
        .await?
        .ok_or_else(|| AppError::not_found(IMAGE_NOT_FOUND))?;

    tracing::debug!(crash = %key, size = bytes.len(), "Serving crash image");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, JPEG_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .body(Body::from(bytes))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
