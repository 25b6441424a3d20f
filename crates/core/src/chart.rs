//! Crash counts per city for the dashboard bar chart.
//!
//! The series is recomputed from scratch whenever the visible list changes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::crash::CrashSummary;

/// Bucket for crashes without a city.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Series label shown on the chart.
pub const SERIES_LABEL: &str = "Crashes by Location";

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Count crashes per city, sorted by city name.
pub fn crashes_by_city<'a, I>(crashes: I) -> Vec<CityCount>
where
    I: IntoIterator<Item = &'a CrashSummary>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for crash in crashes {
        let city = crash
            .city
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITY);
        *counts.entry(city).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect()
}

/// Render the series as horizontal text bars scaled to `width` columns.
pub fn render_bars(series: &[CityCount], width: usize) -> Vec<String> {
    let max = series.iter().map(|c| c.count).max().unwrap_or(0);
    let label_width = series.iter().map(|c| c.city.chars().count()).max().unwrap_or(0);

    series
        .iter()
        .map(|entry| {
            let filled = if max == 0 {
                0
            } else {
                (entry.count * width).div_ceil(max)
            };
            format!(
                "{:<label_width$} | {} {}",
                entry.city,
                "#".repeat(filled),
                entry.count
            )
        })
        .collect()
}
