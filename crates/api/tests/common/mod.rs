#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use crashwatch_api::config::ServerConfig;
use crashwatch_api::router::build_app_router;
use crashwatch_api::state::AppState;
use crashwatch_db::models::crash_image::NewCrashImage;
use crashwatch_db::repositories::CrashRepo;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Restricts CORS to `http://localhost:3333` so preflight behaviour is
/// observable.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:3333".parse().unwrap()],
        request_timeout_secs: 30,
        static_dir: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    let state = AppState { pool };
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// A crash fixture with a small fake JPEG payload.
pub fn crash(camera_id: i64, frame_id: i64, city: &str, district: &str, time: &str) -> NewCrashImage {
    NewCrashImage {
        camera_id,
        frame_id,
        city: Some(city.to_string()),
        district: Some(district.to_string()),
        crash_time: Some(time.to_string()),
        image: Some(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']),
    }
}

/// Insert fixtures through the ingestion upsert.
pub async fn insert_all(pool: &SqlitePool, crashes: &[NewCrashImage]) {
    for crash in crashes {
        CrashRepo::upsert(pool, crash).await.unwrap();
    }
}
