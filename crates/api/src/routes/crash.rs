//! Route definitions for the `/crashes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::crash;
use crate::state::AppState;

/// Crash routes, relative to the `/api` prefix.
///
/// ```text
/// GET /crashes                                -> list
/// GET /crashes/latest                         -> latest
/// GET /crashes/{camera_id}/{frame_id}         -> get_by_key
/// GET /crashes/{camera_id}/{frame_id}/image   -> image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crashes", get(crash::list))
        .route("/crashes/latest", get(crash::latest))
        .route("/crashes/{camera_id}/{frame_id}", get(crash::get_by_key))
        .route("/crashes/{camera_id}/{frame_id}/image", get(crash::image))
}
