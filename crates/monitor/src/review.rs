//! Approve / disapprove review actions.
//!
//! Reviews are confirmations only: nothing is written back to the service.

use crashwatch_core::crash::{CrashKey, CrashSummary};
use crashwatch_core::error::CoreError;
use crashwatch_core::location::{approximate_location, GeoPoint, AREA_RADIUS_METRES, MAP_ZOOM};
use crashwatch_core::timestamp::format_crash_time;
use rand::Rng;

use crate::api::CrashApiError;
use crate::source::CrashSource;
use crate::store::{DashboardStore, PanelSource, ReviewTarget};

/// Selector naming the latest crash instead of a `camera_id-frame_id` pair.
pub const LATEST_SELECTOR: &str = "latest";

/// Errors resolving the crash a review applies to.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Selector(#[from] CoreError),

    #[error(transparent)]
    Source(#[from] CrashApiError),

    #[error("No crash selected for review")]
    NoTarget,
}

/// The reviewer's verdict on a detected crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Disapprove,
}

/// Map view shown when confirming an approval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub centre: GeoPoint,
    pub zoom: u8,
    pub radius_metres: u32,
}

/// Outcome of a review action.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewConfirmation {
    pub key: CrashKey,
    pub decision: ReviewDecision,
    /// Present for approvals only.
    pub map: Option<MapView>,
    pub message: String,
}

impl ReviewConfirmation {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(map) = &self.map {
            lines.push(format!(
                "Crash location: {:.5}, {:.5} (zoom {}, radius {} m)",
                map.centre.lat, map.centre.lng, map.zoom, map.radius_metres
            ));
        }
        lines.push(self.message.clone());
        lines
    }
}

/// Approve a crash, resolving an approximate map location for its city.
pub fn approve<R: Rng>(crash: &CrashSummary, rng: &mut R) -> ReviewConfirmation {
    let key = crash.key();
    let centre = approximate_location(crash.city.as_deref(), rng);
    tracing::info!(
        crash = %key,
        lat = centre.lat,
        lng = centre.lng,
        time = %format_crash_time(crash.crash_time.as_deref()),
        "Crash approved"
    );

    ReviewConfirmation {
        key,
        decision: ReviewDecision::Approve,
        map: Some(MapView {
            centre,
            zoom: MAP_ZOOM,
            radius_metres: AREA_RADIUS_METRES,
        }),
        message: format!(
            "Crash {key} has been approved! Location verified and emergency services will be notified."
        ),
    }
}

/// Mark a crash as a false positive.
pub fn disapprove(crash: &CrashSummary) -> ReviewConfirmation {
    let key = crash.key();
    tracing::info!(crash = %key, "Crash disapproved");

    ReviewConfirmation {
        key,
        decision: ReviewDecision::Disapprove,
        map: None,
        message: format!("Crash {key} has been marked as disapproved (false positive)."),
    }
}

/// Load the crash named by `selector` into `store` and report which panel
/// holds it: [`LATEST_SELECTOR`] shows the latest crash, anything else is
/// parsed as `camera_id-frame_id` and selected from the list.
pub async fn load_target<S: CrashSource>(
    source: &S,
    store: &mut DashboardStore,
    selector: &str,
) -> Result<ReviewTarget, ReviewError> {
    if selector.eq_ignore_ascii_case(LATEST_SELECTOR) {
        let latest = source.latest().await?;
        store.show_latest(latest.crash, PanelSource::Latest);
        return Ok(ReviewTarget::Latest);
    }

    let key: CrashKey = selector.parse()?;
    let crash = source.get(key).await?;
    store.replace_crashes(vec![crash]);
    store.select(key).ok_or(ReviewError::NoTarget)?;
    Ok(ReviewTarget::Detail)
}

pub fn review<R: Rng>(
    decision: ReviewDecision,
    crash: &CrashSummary,
    rng: &mut R,
) -> ReviewConfirmation {
    match decision {
        ReviewDecision::Approve => approve(crash, rng),
        ReviewDecision::Disapprove => disapprove(crash),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use crashwatch_core::crash::LatestCrash;
    use crashwatch_core::location::{city_coordinates, JITTER_DEGREES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Serves a single stored crash, which is also the latest one.
    struct OneCrash(CrashSummary);

    #[async_trait]
    impl CrashSource for OneCrash {
        async fn latest(&self) -> Result<LatestCrash, CrashApiError> {
            Ok(LatestCrash::from(self.0.clone()))
        }

        async fn list(&self) -> Result<Vec<CrashSummary>, CrashApiError> {
            Ok(vec![self.0.clone()])
        }

        async fn get(&self, key: CrashKey) -> Result<CrashSummary, CrashApiError> {
            if key == self.0.key() {
                Ok(self.0.clone())
            } else {
                Err(CrashApiError::NotFound("Crash record not found".into()))
            }
        }
    }

    fn crash() -> CrashSummary {
        CrashSummary {
            camera_id: 12,
            frame_id: 340,
            city: Some("Mumbai".to_string()),
            district: Some("Bandra".to_string()),
            crash_time: Some("2024-01-15 10:30:00".to_string()),
        }
    }

    #[test]
    fn approve_places_map_near_city() {
        let mut rng = StdRng::seed_from_u64(7);
        let confirmation = approve(&crash(), &mut rng);

        assert_eq!(confirmation.decision, ReviewDecision::Approve);
        assert_eq!(
            confirmation.message,
            "Crash 12-340 has been approved! Location verified and emergency services will be notified."
        );

        let map = confirmation.map.unwrap();
        let base = city_coordinates(Some("Mumbai"));
        assert!((map.centre.lat - base.lat).abs() <= JITTER_DEGREES + 1e-9);
        assert!((map.centre.lng - base.lng).abs() <= JITTER_DEGREES + 1e-9);
        assert_eq!(map.zoom, 15);
        assert_eq!(map.radius_metres, 100);
        assert_eq!(confirmation.lines().len(), 2);
    }

    #[test]
    fn disapprove_has_no_map() {
        let mut rng = StdRng::seed_from_u64(7);
        let confirmation = review(ReviewDecision::Disapprove, &crash(), &mut rng);

        assert_eq!(confirmation.key, CrashKey::new(12, 340));
        assert!(confirmation.map.is_none());
        assert!(confirmation.message.contains("false positive"));
        assert_eq!(confirmation.lines(), vec![confirmation.message.clone()]);
    }

    #[tokio::test]
    async fn target_by_selector_selects_detail() {
        let source = OneCrash(crash());
        let mut store = DashboardStore::default();

        let target = load_target(&source, &mut store, "12-340").await.unwrap();

        assert_eq!(target, ReviewTarget::Detail);
        assert_eq!(
            store.review_target(target).map(|c| c.key()),
            Some(CrashKey::new(12, 340))
        );
    }

    #[tokio::test]
    async fn latest_selector_uses_latest_panel() {
        let source = OneCrash(crash());
        let mut store = DashboardStore::default();

        let target = load_target(&source, &mut store, "latest").await.unwrap();

        assert_eq!(target, ReviewTarget::Latest);
        assert_eq!(
            store.review_target(target).map(|c| c.key()),
            Some(CrashKey::new(12, 340))
        );
        assert!(store.review_target(ReviewTarget::Detail).is_none());
    }

    #[tokio::test]
    async fn unknown_or_malformed_selector_fails() {
        let source = OneCrash(crash());
        let mut store = DashboardStore::default();

        assert_matches!(
            load_target(&source, &mut store, "1-1").await,
            Err(ReviewError::Source(e)) if e.is_not_found()
        );
        assert_matches!(
            load_target(&source, &mut store, "12_340").await,
            Err(ReviewError::Selector(CoreError::Validation(_)))
        );
    }
}
