//! Crash record identity and the read-model projection.
//!
//! A crash is identified by the `(camera_id, frame_id)` pair. Its textual
//! form, `"{camera_id}-{frame_id}"`, is what the dashboard compares between
//! polls and what links use to select a record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Identity of the seeded test crash used as the first fallback.
pub const TEST_CRASH_KEY: CrashKey = CrashKey {
    camera_id: 9999,
    frame_id: 1,
};

/// City shown on the placeholder record.
pub const PLACEHOLDER_CITY: &str = "Test City";

/// District shown on the placeholder record.
pub const PLACEHOLDER_DISTRICT: &str = "Test District";

/// Location label used when a record has no city.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

// ---------------------------------------------------------------------------
// CrashKey
// ---------------------------------------------------------------------------

/// The `(camera_id, frame_id)` identity of a crash record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CrashKey {
    pub camera_id: DbId,
    pub frame_id: DbId,
}

impl CrashKey {
    pub fn new(camera_id: DbId, frame_id: DbId) -> Self {
        Self {
            camera_id,
            frame_id,
        }
    }

    /// Relative URL of the image endpoint for this crash.
    pub fn image_url(&self) -> String {
        format!("/api/crashes/{}/{}/image", self.camera_id, self.frame_id)
    }

    /// Relative URL of the detail endpoint for this crash.
    pub fn detail_url(&self) -> String {
        format!("/api/crashes/{}/{}", self.camera_id, self.frame_id)
    }

    /// Parse a pair of raw path segments. Returns `None` unless both are
    /// integers.
    pub fn from_segments(camera_id: &str, frame_id: &str) -> Option<Self> {
        let camera_id = camera_id.trim().parse().ok()?;
        let frame_id = frame_id.trim().parse().ok()?;
        Some(Self::new(camera_id, frame_id))
    }
}

impl fmt::Display for CrashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.camera_id, self.frame_id)
    }
}

impl FromStr for CrashKey {
    type Err = CoreError;

    /// Parse a `camera_id-frame_id` selector.
    ///
    /// Exactly two `-`-separated parts are required, so negative ids cannot
    /// be expressed in selector form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let [camera_id, frame_id] = parts.as_slice() else {
            return Err(CoreError::Validation(format!(
                "invalid crash selector '{s}', expected camera_id-frame_id"
            )));
        };
        Self::from_segments(camera_id, frame_id).ok_or_else(|| {
            CoreError::Validation(format!(
                "invalid crash selector '{s}', ids must be integers"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// The non-blob columns of a crash record, as returned by the list and
/// detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashSummary {
    pub camera_id: DbId,
    pub frame_id: DbId,
    pub city: Option<String>,
    pub district: Option<String>,
    pub crash_time: Option<String>,
}

impl CrashSummary {
    pub fn key(&self) -> CrashKey {
        CrashKey::new(self.camera_id, self.frame_id)
    }

    /// `City, District`, `City`, or [`UNKNOWN_LOCATION`].
    pub fn location_label(&self) -> String {
        match (non_empty(&self.city), non_empty(&self.district)) {
            (Some(city), Some(district)) => format!("{city}, {district}"),
            (Some(city), None) => city.to_string(),
            (None, _) => UNKNOWN_LOCATION.to_string(),
        }
    }

    /// The hardcoded record shown when neither the latest crash nor the test
    /// crash can be fetched.
    pub fn placeholder(crash_time: String) -> Self {
        Self {
            camera_id: TEST_CRASH_KEY.camera_id,
            frame_id: TEST_CRASH_KEY.frame_id,
            city: Some(PLACEHOLDER_CITY.to_string()),
            district: Some(PLACEHOLDER_DISTRICT.to_string()),
            crash_time: Some(crash_time),
        }
    }
}

/// The latest crash projection annotated with its image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCrash {
    #[serde(flatten)]
    pub crash: CrashSummary,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl From<CrashSummary> for LatestCrash {
    fn from(crash: CrashSummary) -> Self {
        let image_url = crash.key().image_url();
        Self { crash, image_url }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn summary(city: Option<&str>, district: Option<&str>) -> CrashSummary {
        CrashSummary {
            camera_id: 3,
            frame_id: 41,
            city: city.map(String::from),
            district: district.map(String::from),
            crash_time: Some("2024-01-15 10:30:00".into()),
        }
    }

    #[test]
    fn key_displays_as_selector() {
        assert_eq!(CrashKey::new(12, 340).to_string(), "12-340");
    }

    #[test]
    fn selector_parses_two_integer_parts() {
        let key: CrashKey = "12-340".parse().unwrap();
        assert_eq!(key, CrashKey::new(12, 340));
    }

    #[test]
    fn selector_rejects_wrong_part_count() {
        assert_matches!("12".parse::<CrashKey>(), Err(CoreError::Validation(_)));
        assert_matches!("1-2-3".parse::<CrashKey>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn selector_rejects_non_integer_parts() {
        assert_matches!("cam-1".parse::<CrashKey>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn segments_require_integers() {
        assert_eq!(CrashKey::from_segments("7", "8"), Some(CrashKey::new(7, 8)));
        assert_eq!(CrashKey::from_segments("abc", "8"), None);
    }

    #[test]
    fn image_url_uses_both_ids() {
        assert_eq!(CrashKey::new(9999, 1).image_url(), "/api/crashes/9999/1/image");
    }

    #[test]
    fn location_label_variants() {
        assert_eq!(summary(Some("Pune"), Some("Kothrud")).location_label(), "Pune, Kothrud");
        assert_eq!(summary(Some("Pune"), None).location_label(), "Pune");
        assert_eq!(summary(Some("Pune"), Some("")).location_label(), "Pune");
        assert_eq!(summary(None, Some("Kothrud")).location_label(), "Unknown Location");
    }

    #[test]
    fn latest_crash_serializes_flat_with_image_url() {
        let latest = LatestCrash::from(summary(Some("Delhi"), None));
        let json = serde_json::to_value(&latest).unwrap();
        assert_eq!(json["camera_id"], 3);
        assert_eq!(json["frame_id"], 41);
        assert_eq!(json["city"], "Delhi");
        assert!(json["district"].is_null());
        assert_eq!(json["imageUrl"], "/api/crashes/3/41/image");
    }

    #[test]
    fn placeholder_uses_test_identity() {
        let crash = CrashSummary::placeholder("2024-01-01 00:00:00".into());
        assert_eq!(crash.key(), TEST_CRASH_KEY);
        assert_eq!(crash.location_label(), "Test City, Test District");
    }
}
