//! Plain-text rendering of the dashboard panels.
//!
//! Every function returns lines rather than printing, so the output can be
//! asserted on directly.

use chrono::{DateTime, Local};
use crashwatch_core::chart::{render_bars, CityCount, SERIES_LABEL};
use crashwatch_core::crash::CrashSummary;
use crashwatch_core::filter::{CrashFilter, FilterOptions};
use crashwatch_core::timestamp::format_crash_time;

use crate::store::{DashboardStore, LatestPanel, PanelSource};

/// Width of the longest chart bar, in columns.
pub const CHART_WIDTH: usize = 40;

const NO_CRASHES: &str = "No crashes found";

/// The latest crash panel.
pub fn latest_panel(panel: &LatestPanel, last_updated: Option<DateTime<Local>>) -> Vec<String> {
    let mut lines = vec!["== Latest Crash ==".to_string()];

    match panel {
        LatestPanel::Empty => lines.push("Waiting for data...".to_string()),
        LatestPanel::NotFound { selector } => {
            lines.push("Crash Not Found".to_string());
            lines.push(format!("Crash {selector} was not found in the database."));
            lines.push("It may have been removed or the link is invalid.".to_string());
        }
        LatestPanel::Crash { crash, source } => {
            if let Some(note) = source_note(*source) {
                lines.push(note.to_string());
            }
            lines.push(format!("ID:       {}", crash.key()));
            lines.push(format!("Location: {}", crash.location_label()));
            lines.push(format!(
                "Time:     {}",
                format_crash_time(crash.crash_time.as_deref())
            ));
            lines.push(format!("Image:    {}", crash.key().image_url()));
        }
    }

    if let Some(at) = last_updated {
        lines.push(format!("Last updated: {}", at.format("%H:%M:%S")));
    }
    lines
}

fn source_note(source: PanelSource) -> Option<&'static str> {
    match source {
        PanelSource::Latest => None,
        PanelSource::Linked => Some("[loaded from link]"),
        PanelSource::TestRecord => Some("[test record]"),
        PanelSource::Placeholder => Some("[placeholder, service unavailable]"),
    }
}

/// One entry per crash, or a single "No crashes found" line.
pub fn crash_list(crashes: &[&CrashSummary]) -> Vec<String> {
    if crashes.is_empty() {
        return vec![NO_CRASHES.to_string()];
    }

    crashes
        .iter()
        .map(|crash| {
            format!(
                "ID: {}  {}  {}",
                crash.key(),
                crash.location_label(),
                format_crash_time(crash.crash_time.as_deref())
            )
        })
        .collect()
}

/// The city bar chart.
pub fn chart(series: &[CityCount]) -> Vec<String> {
    let mut lines = vec![format!("== {SERIES_LABEL} ==")];
    if series.is_empty() {
        lines.push(NO_CRASHES.to_string());
    } else {
        lines.extend(render_bars(series, CHART_WIDTH));
    }
    lines
}

/// Available filter choices and the active selection.
pub fn filters(options: &FilterOptions, active: &CrashFilter) -> Vec<String> {
    let mut lines = vec![
        format!("Cities:    All Cities, {}", options.cities.join(", ")),
        format!("Districts: All Districts, {}", options.districts.join(", ")),
    ];
    if !active.is_empty() {
        lines.push(format!("Active:    {}", describe_filter(active)));
    }
    lines
}

fn describe_filter(filter: &CrashFilter) -> String {
    let mut parts = Vec::new();
    if let Some(city) = filter.city.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("city={city}"));
    }
    if let Some(district) = filter.district.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("district={district}"));
    }
    if let Some(start) = filter.start_date {
        parts.push(format!("from={start}"));
    }
    if let Some(end) = filter.end_date {
        parts.push(format!("to={end}"));
    }
    parts.join(" ")
}

/// Detail view for a selected crash.
pub fn crash_detail(crash: &CrashSummary) -> Vec<String> {
    vec![
        format!("Crash #{}", crash.key()),
        format!("Location: {}", crash.location_label()),
        format!("Time:     {}", format_crash_time(crash.crash_time.as_deref())),
        format!("Image:    {}", crash.key().image_url()),
    ]
}

/// The whole dashboard as one block of text.
pub fn dashboard(store: &DashboardStore) -> String {
    let mut lines = latest_panel(store.latest_panel(), store.last_updated());
    lines.push(String::new());
    lines.extend(overview_lines(store));
    lines.join("\n")
}

/// Filters, crash list, selected crash and chart, without the latest panel.
pub fn overview(store: &DashboardStore) -> String {
    overview_lines(store).join("\n")
}

fn overview_lines(store: &DashboardStore) -> Vec<String> {
    let visible = store.visible();
    let mut lines = filters(&store.options(), store.filter());

    lines.push(String::new());
    lines.push(format!(
        "== Crashes ({} of {}) ==",
        visible.len(),
        store.crashes().len()
    ));
    lines.extend(crash_list(&visible));

    if let Some(selected) = store.selected() {
        lines.push(String::new());
        lines.extend(crash_detail(selected));
    }

    lines.push(String::new());
    lines.extend(chart(&store.chart()));
    lines
}

#[cfg(test)]
mod tests {
    use crashwatch_core::crash::CrashKey;

    use super::*;

    fn crash(city: Option<&str>, district: Option<&str>, time: Option<&str>) -> CrashSummary {
        CrashSummary {
            camera_id: 3,
            frame_id: 42,
            city: city.map(String::from),
            district: district.map(String::from),
            crash_time: time.map(String::from),
        }
    }

    #[test]
    fn empty_list_renders_message() {
        assert_eq!(crash_list(&[]), vec!["No crashes found"]);
    }

    #[test]
    fn list_entries_show_id_location_and_time() {
        let full = crash(Some("Pune"), Some("Kothrud"), Some("2024-01-15 10:30:00"));
        let bare = crash(None, None, None);
        let lines = crash_list(&[&full, &bare]);

        assert_eq!(lines[0], "ID: 3-42  Pune, Kothrud  2024-01-15 10:30:00");
        assert_eq!(lines[1], "ID: 3-42  Unknown Location  Unknown");
    }

    #[test]
    fn not_found_panel() {
        let panel = LatestPanel::NotFound {
            selector: "1-99".to_string(),
        };
        let lines = latest_panel(&panel, None);
        assert!(lines.contains(&"Crash Not Found".to_string()));
        assert!(lines.iter().any(|l| l.contains("Crash 1-99 was not found")));
    }

    #[test]
    fn placeholder_panel_is_marked() {
        let panel = LatestPanel::Crash {
            crash: CrashSummary::placeholder("2024-01-15 10:30:00".to_string()),
            source: PanelSource::Placeholder,
        };
        let lines = latest_panel(&panel, None);
        assert_eq!(lines[1], "[placeholder, service unavailable]");
        assert!(lines.contains(&"ID:       9999-1".to_string()));
        assert!(lines.contains(&"Image:    /api/crashes/9999/1/image".to_string()));
    }

    #[test]
    fn chart_has_series_label() {
        let lines = chart(&[CityCount {
            city: "Pune".to_string(),
            count: 2,
        }]);
        assert_eq!(lines[0], "== Crashes by Location ==");
        assert!(lines[1].starts_with("Pune | "));
        assert_eq!(chart(&[])[1], "No crashes found");
    }

    #[test]
    fn filters_show_active_selection() {
        let options = FilterOptions {
            cities: vec!["Delhi".to_string(), "Pune".to_string()],
            districts: vec![],
        };
        assert_eq!(filters(&options, &CrashFilter::default()).len(), 2);

        let lines = filters(&options, &CrashFilter::default().with_city("Pune"));
        assert_eq!(lines[0], "Cities:    All Cities, Delhi, Pune");
        assert_eq!(lines[2], "Active:    city=Pune");
    }

    #[test]
    fn dashboard_counts_visible_crashes() {
        let mut store = DashboardStore::new(CrashFilter::default().with_city("Pune"));
        store.replace_crashes(vec![
            crash(Some("Pune"), None, Some("2024-01-15 10:30:00")),
            CrashSummary {
                frame_id: 43,
                ..crash(Some("Delhi"), None, None)
            },
        ]);

        let text = dashboard(&store);
        assert!(text.contains("== Crashes (1 of 2) =="));
        assert!(text.contains("Waiting for data..."));
        assert!(text.contains("Pune | "));
        assert!(!text.contains("Delhi | "));

        store.select(CrashKey::new(3, 42));
        let text = overview(&store);
        assert!(!text.contains("Latest Crash"));
        assert!(text.contains("Crash #3-42"));
    }
}
