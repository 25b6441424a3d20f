//! The data source seam between the poller and the HTTP client.

use async_trait::async_trait;
use crashwatch_core::crash::{CrashKey, CrashSummary, LatestCrash};

use crate::api::{CrashApi, CrashApiError};

/// Read access to crash records, as the dashboard needs it.
#[async_trait]
pub trait CrashSource: Send + Sync {
    /// The most recent crash.
    async fn latest(&self) -> Result<LatestCrash, CrashApiError>;

    /// All crashes, most recent first.
    async fn list(&self) -> Result<Vec<CrashSummary>, CrashApiError>;

    /// One crash by identity.
    async fn get(&self, key: CrashKey) -> Result<CrashSummary, CrashApiError>;
}

#[async_trait]
impl CrashSource for CrashApi {
    async fn latest(&self) -> Result<LatestCrash, CrashApiError> {
        CrashApi::latest(self).await
    }

    async fn list(&self) -> Result<Vec<CrashSummary>, CrashApiError> {
        CrashApi::list(self).await
    }

    async fn get(&self, key: CrashKey) -> Result<CrashSummary, CrashApiError> {
        CrashApi::get(self, key).await
    }
}
