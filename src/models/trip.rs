//! Trip requests, candidate windows and signal records

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A parsed trip request: where to go and for how long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    /// Destination names in request order (1..=3, duplicates allowed)
    pub destinations: Vec<String>,
    /// Trip length in calendar days, always >= 1
    pub duration_days: u32,
}

/// A contiguous, inclusive date range of fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build the window starting at `start` spanning `duration_days`
    /// calendar days (inclusive of both ends).
    #[must_use]
    pub fn from_duration(start: NaiveDate, duration_days: u32) -> Self {
        let end = start + Duration::days(i64::from(duration_days) - 1);
        Self { start, end }
    }

    /// Inclusive interval overlap with another window
    #[must_use]
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Iterate every calendar day in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Number of calendar days covered by the window
    #[must_use]
    pub fn len_days(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

/// A persisted road closure for one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureRecord {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl ClosureRecord {
    /// Inclusive overlap between the closure interval and a window:
    /// a closure ending exactly on the window start (or starting
    /// exactly on the window end) still conflicts.
    #[must_use]
    pub fn conflicts_with(&self, window: &DateWindow) -> bool {
        DateWindow {
            start: self.start_date,
            end: self.end_date,
        }
        .overlaps(window)
    }
}

/// A persisted congestion score for one location and weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub location: String,
    /// Weekday index, Monday = 0 through Sunday = 6
    pub day_of_week: u8,
    pub score: f64,
}

/// One day of forecast data; `None` fields mean the provider reported
/// no data for that day, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub precipitation_mm: Option<f64>,
    pub weather_code: Option<i32>,
}

/// A fully scored candidate window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWindow {
    pub window: DateWindow,
    pub total_score: f64,
    /// Three reasons per destination, in destination order then
    /// weather/closure/traffic order
    pub reasons: Vec<String>,
}

/// The final recommendation for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub destinations: Vec<String>,
    pub duration_days: u32,
    pub best_window: ScoredWindow,
}
