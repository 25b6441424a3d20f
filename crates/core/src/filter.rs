//! Client-side crash filtering.
//!
//! Filters are applied to the in-memory crash list held by the dashboard;
//! nothing here touches the database. City and district are exact matches.
//! The date range is inclusive on both ends, the end date extending to the
//! last millisecond of its day.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::crash::CrashSummary;
use crate::error::CoreError;
use crate::timestamp::{end_of_day, parse_crash_time, start_of_day};

/// Active filter selection. `None` (or an empty string) means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashFilter {
    pub city: Option<String>,
    pub district: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CrashFilter {
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.city).is_none()
            && active(&self.district).is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Evaluate the filter against a single crash.
    pub fn matches(&self, crash: &CrashSummary) -> bool {
        if let Some(city) = active(&self.city) {
            if crash.city.as_deref() != Some(city) {
                return false;
            }
        }

        if let Some(district) = active(&self.district) {
            if crash.district.as_deref() != Some(district) {
                return false;
            }
        }

        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }

        let Some(crash_time) = crash.crash_time.as_deref().and_then(parse_crash_time) else {
            return false;
        };

        if let Some(start) = self.start_date {
            if crash_time < start_of_day(start) {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if crash_time > end_of_day(end) {
                return false;
            }
        }

        true
    }

    /// Keep the crashes that match, preserving order.
    pub fn apply<'a>(&self, crashes: &'a [CrashSummary]) -> Vec<&'a CrashSummary> {
        crashes.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Parse a `YYYY-MM-DD` date input. Empty input means "no bound".
pub fn parse_date_input(raw: &str) -> Result<Option<NaiveDate>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| CoreError::Validation(format!("invalid date '{raw}': {e}")))
}

/// Choices offered by the city and district filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub districts: Vec<String>,
}

impl FilterOptions {
    /// Sorted, de-duplicated, non-empty cities and districts.
    pub fn from_crashes(crashes: &[CrashSummary]) -> Self {
        let mut cities = BTreeSet::new();
        let mut districts = BTreeSet::new();
        for crash in crashes {
            if let Some(city) = active(&crash.city) {
                cities.insert(city.to_string());
            }
            if let Some(district) = active(&crash.district) {
                districts.insert(district.to_string());
            }
        }
        Self {
            cities: cities.into_iter().collect(),
            districts: districts.into_iter().collect(),
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn crash(frame_id: i64, city: &str, district: &str, time: Option<&str>) -> CrashSummary {
        CrashSummary {
            camera_id: 1,
            frame_id,
            city: Some(city.to_string()),
            district: Some(district.to_string()),
            crash_time: time.map(String::from),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<CrashSummary> {
        vec![
            crash(1, "Mumbai", "Andheri", Some("2024-02-01 00:00:00")),
            crash(2, "Mumbai", "Andheri", Some("2024-01-31 23:59:59.999")),
            crash(3, "Mumbai", "Bandra", Some("2024-01-01 00:00:00")),
            crash(4, "Delhi", "Saket", Some("2024-01-15 12:00:00")),
            crash(5, "Mumbai", "Bandra", Some("2023-12-31 23:59:59")),
            crash(6, "Mumbai", "Bandra", None),
        ]
    }

    fn frames(found: Vec<&CrashSummary>) -> Vec<i64> {
        found.into_iter().map(|c| c.frame_id).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let crashes = sample();
        let filter = CrashFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&crashes).len(), crashes.len());
    }

    #[test]
    fn empty_strings_are_inactive() {
        let filter = CrashFilter::default().with_city("").with_district("");
        assert!(filter.is_empty());
    }

    #[test]
    fn city_and_january_range() {
        let crashes = sample();
        let filter = CrashFilter::default()
            .with_city("Mumbai")
            .with_date_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));

        assert_eq!(frames(filter.apply(&crashes)), vec![2, 3]);
    }

    #[test]
    fn district_is_exact_match() {
        let crashes = sample();
        let filter = CrashFilter::default().with_district("Bandra");
        assert_eq!(frames(filter.apply(&crashes)), vec![3, 5, 6]);

        let filter = CrashFilter::default().with_district("bandra");
        assert!(filter.apply(&crashes).is_empty());
    }

    #[test]
    fn open_ended_ranges() {
        let crashes = sample();
        let from = CrashFilter::default().with_date_range(Some(date(2024, 1, 15)), None);
        assert_eq!(frames(from.apply(&crashes)), vec![1, 2, 4]);

        let until = CrashFilter::default().with_date_range(None, Some(date(2023, 12, 31)));
        assert_eq!(frames(until.apply(&crashes)), vec![5]);
    }

    #[test]
    fn missing_time_excluded_only_when_dates_active() {
        let missing = crash(9, "Pune", "Kothrud", None);
        assert!(CrashFilter::default().with_city("Pune").matches(&missing));
        assert!(!CrashFilter::default()
            .with_date_range(Some(date(2024, 1, 1)), None)
            .matches(&missing));
    }

    #[test]
    fn date_input_parsing() {
        assert_eq!(parse_date_input("2024-01-31").unwrap(), Some(date(2024, 1, 31)));
        assert_eq!(parse_date_input(" ").unwrap(), None);
        assert_matches!(parse_date_input("31/01/2024"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn options_are_sorted_and_unique() {
        let mut crashes = sample();
        crashes.push(CrashSummary {
            camera_id: 2,
            frame_id: 1,
            city: None,
            district: Some(String::new()),
            crash_time: None,
        });

        let options = FilterOptions::from_crashes(&crashes);
        assert_eq!(options.cities, vec!["Delhi", "Mumbai"]);
        assert_eq!(options.districts, vec!["Andheri", "Bandra", "Saket"]);
    }
}
