//! Client-side dashboard state.
//!
//! The store owns the fetched crash list and the current selections. The
//! visible list, filter options and chart series are derived from it on
//! demand and never cached.

use chrono::{DateTime, Local};
use crashwatch_core::chart::{crashes_by_city, CityCount};
use crashwatch_core::crash::{CrashKey, CrashSummary};
use crashwatch_core::filter::{CrashFilter, FilterOptions};

/// Where the crash in the latest panel came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSource {
    /// The service's latest crash.
    Latest,
    /// A record named by a `camera_id-frame_id` selector.
    Linked,
    /// The seeded test record, shown when no latest crash is available.
    TestRecord,
    /// The hardcoded placeholder, shown when nothing can be fetched.
    Placeholder,
}

/// Contents of the "latest crash" panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LatestPanel {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// A crash is on display.
    Crash {
        crash: CrashSummary,
        source: PanelSource,
    },
    /// A selector named a crash that does not exist or could not be parsed.
    NotFound { selector: String },
}

/// Which crash a review action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    /// The crash in the latest panel.
    Latest,
    /// The crash selected from the list.
    Detail,
}

/// Dashboard state shared by the poller and the renderer.
#[derive(Debug, Default)]
pub struct DashboardStore {
    crashes: Vec<CrashSummary>,
    filter: CrashFilter,
    selected: Option<CrashKey>,
    latest: LatestPanel,
    last_updated: Option<DateTime<Local>>,
}

impl DashboardStore {
    pub fn new(filter: CrashFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    // -- crash list -------------------------------------------------------

    /// Replace the full crash list. A selection that no longer exists is
    /// dropped.
    pub fn replace_crashes(&mut self, crashes: Vec<CrashSummary>) {
        self.crashes = crashes;
        if let Some(key) = self.selected {
            if !self.crashes.iter().any(|c| c.key() == key) {
                self.selected = None;
            }
        }
    }

    pub fn crashes(&self) -> &[CrashSummary] {
        &self.crashes
    }

    /// City and district choices derived from the full list.
    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_crashes(&self.crashes)
    }

    // -- filtering --------------------------------------------------------

    pub fn filter(&self) -> &CrashFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: CrashFilter) {
        self.filter = filter;
    }

    /// Crashes passing the active filter, in list order.
    pub fn visible(&self) -> Vec<&CrashSummary> {
        self.filter.apply(&self.crashes)
    }

    /// Chart series for the visible crashes, recomputed on every call.
    pub fn chart(&self) -> Vec<CityCount> {
        crashes_by_city(self.visible())
    }

    // -- selection --------------------------------------------------------

    /// Select a crash from the list. Returns `None`, leaving the selection
    /// unchanged, if no such crash is loaded.
    pub fn select(&mut self, key: CrashKey) -> Option<&CrashSummary> {
        let crash = self.crashes.iter().find(|c| c.key() == key)?;
        self.selected = Some(key);
        Some(crash)
    }

    pub fn selected(&self) -> Option<&CrashSummary> {
        let key = self.selected?;
        self.crashes.iter().find(|c| c.key() == key)
    }

    // -- latest panel -----------------------------------------------------

    /// Put a crash in the latest panel.
    ///
    /// Returns `true` when the panel now shows a different crash or source
    /// than before, i.e. when a redraw is warranted.
    pub fn show_latest(&mut self, crash: CrashSummary, source: PanelSource) -> bool {
        let changed = match &self.latest {
            LatestPanel::Crash {
                crash: current,
                source: current_source,
            } => current.key() != crash.key() || *current_source != source,
            _ => true,
        };
        self.latest = LatestPanel::Crash { crash, source };
        self.last_updated = Some(Local::now());
        changed
    }

    /// Replace the latest panel with a "not found" message.
    pub fn show_not_found(&mut self, selector: impl Into<String>) {
        self.latest = LatestPanel::NotFound {
            selector: selector.into(),
        };
    }

    pub fn latest_panel(&self) -> &LatestPanel {
        &self.latest
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// The crash a review action applies to, if any.
    pub fn review_target(&self, target: ReviewTarget) -> Option<&CrashSummary> {
        match target {
            ReviewTarget::Latest => match &self.latest {
                LatestPanel::Crash { crash, .. } => Some(crash),
                _ => None,
            },
            ReviewTarget::Detail => self.selected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn crash(camera_id: i64, frame_id: i64, city: &str, time: &str) -> CrashSummary {
        CrashSummary {
            camera_id,
            frame_id,
            city: Some(city.to_string()),
            district: Some(format!("{city} East")),
            crash_time: Some(time.to_string()),
        }
    }

    fn sample() -> Vec<CrashSummary> {
        vec![
            crash(1, 3, "Mumbai", "2024-02-02 10:00:00"),
            crash(1, 2, "Delhi", "2024-01-20 10:00:00"),
            crash(1, 1, "Mumbai", "2024-01-10 10:00:00"),
        ]
    }

    #[test]
    fn derived_state_follows_filter() {
        let mut store = DashboardStore::default();
        store.replace_crashes(sample());
        assert_eq!(store.visible().len(), 3);
        assert_eq!(store.chart().len(), 2);

        store.set_filter(CrashFilter::default().with_city("Mumbai").with_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        ));
        let visible: Vec<CrashKey> = store.visible().iter().map(|c| c.key()).collect();
        assert_eq!(visible, vec![CrashKey::new(1, 1)]);

        let chart = store.chart();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].city, "Mumbai");
        assert_eq!(chart[0].count, 1);

        // Options always come from the full list.
        assert_eq!(store.options().cities, vec!["Delhi", "Mumbai"]);
    }

    #[test]
    fn selection_requires_loaded_crash_and_survives_refresh() {
        let mut store = DashboardStore::default();
        store.replace_crashes(sample());

        assert!(store.select(CrashKey::new(7, 7)).is_none());
        assert!(store.selected().is_none());

        assert!(store.select(CrashKey::new(1, 2)).is_some());
        store.replace_crashes(sample());
        assert_eq!(store.selected().map(|c| c.key()), Some(CrashKey::new(1, 2)));

        store.replace_crashes(vec![crash(1, 3, "Mumbai", "2024-02-02 10:00:00")]);
        assert!(store.selected().is_none());
    }

    #[test]
    fn show_latest_reports_changes() {
        let mut store = DashboardStore::default();
        let first = crash(1, 3, "Mumbai", "2024-02-02 10:00:00");

        assert!(store.show_latest(first.clone(), PanelSource::Latest));
        assert!(!store.show_latest(first.clone(), PanelSource::Latest));
        assert!(store.show_latest(first, PanelSource::TestRecord));
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn review_targets() {
        let mut store = DashboardStore::default();
        assert!(store.review_target(ReviewTarget::Latest).is_none());
        assert!(store.review_target(ReviewTarget::Detail).is_none());

        store.replace_crashes(sample());
        store.show_latest(sample()[0].clone(), PanelSource::Latest);
        store.select(CrashKey::new(1, 1));

        assert_eq!(
            store.review_target(ReviewTarget::Latest).map(|c| c.key()),
            Some(CrashKey::new(1, 3))
        );
        assert_eq!(
            store.review_target(ReviewTarget::Detail).map(|c| c.key()),
            Some(CrashKey::new(1, 1))
        );

        store.show_not_found("1-99");
        assert!(store.review_target(ReviewTarget::Latest).is_none());
    }
}
