//! REST client for the crash query service.
//!
//! Wraps the `/api/crashes` endpoints using [`reqwest`].

use std::time::Duration;

use crashwatch_core::crash::{CrashKey, CrashSummary, LatestCrash};
use serde::Deserialize;

/// HTTP client for one query service instance.
pub struct CrashApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the query service client.
#[derive(Debug, thiserror::Error)]
pub enum CrashApiError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service returned any other non-2xx status code.
    #[error("Crash API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl CrashApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrashApiError::NotFound(_))
    }
}

/// Error body shape returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl CrashApi {
    /// Create a client for the service at `base_url`, e.g. `http://host:3333`.
    ///
    /// Every request is abandoned after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CrashApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/crashes`
    pub async fn list(&self) -> Result<Vec<CrashSummary>, CrashApiError> {
        self.get_json("/api/crashes").await
    }

    /// `GET /api/crashes/latest`
    pub async fn latest(&self) -> Result<LatestCrash, CrashApiError> {
        self.get_json("/api/crashes/latest").await
    }

    /// `GET /api/crashes/{camera_id}/{frame_id}`
    pub async fn get(&self, key: CrashKey) -> Result<CrashSummary, CrashApiError> {
        self.get_json(&key.detail_url()).await
    }

    /// `GET /api/crashes/{camera_id}/{frame_id}/image`
    pub async fn image(&self, key: CrashKey) -> Result<Vec<u8>, CrashApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, key.image_url()))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CrashApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map non-2xx responses to [`CrashApiError`], pulling the message out
    /// of the service's `{"error": ...}` body when present.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CrashApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if status == reqwest::StatusCode::NOT_FOUND {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(CrashApiError::NotFound(message));
        }

        Err(CrashApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = CrashApi::with_client(reqwest::Client::new(), "http://localhost:3333/");
        assert_eq!(api.base_url(), "http://localhost:3333");
    }

    #[test]
    fn not_found_is_classified() {
        assert!(CrashApiError::NotFound("Image not found".into()).is_not_found());
        assert!(!CrashApiError::Api {
            status: 500,
            body: String::new()
        }
        .is_not_found());
    }
}
