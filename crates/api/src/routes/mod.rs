pub mod crash;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /crashes                                   list (most recent first)
/// /crashes/latest                            latest crash with imageUrl
/// /crashes/{camera_id}/{frame_id}            crash detail
/// /crashes/{camera_id}/{frame_id}/image      JPEG snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(crash::router())
}
