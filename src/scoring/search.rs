//! Candidate enumeration and best-window selection

use crate::Result;
use crate::error::TripError;
use crate::location_resolver;
use crate::models::{DateWindow, Recommendation, ResolvedLocation, ScoredWindow, TripRequest};
use crate::scoring::DestinationScorer;
use crate::store::TravelStore;
use crate::weather::WeatherProvider;
use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument};

/// Every candidate window starts from this score before penalties
pub const BASE_SCORE: f64 = 10.0;
/// Candidate start dates are searched this many days ahead of "now"
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Enumerates every candidate start date in the horizon, scores each
/// window across all destinations, and keeps the best one.
pub struct WindowSearch<'a> {
    weather: &'a dyn WeatherProvider,
    store: &'a dyn TravelStore,
    horizon_days: u32,
}

impl<'a> WindowSearch<'a> {
    pub fn new(weather: &'a dyn WeatherProvider, store: &'a dyn TravelStore) -> Self {
        Self {
            weather,
            store,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Recommend the best window for `request`, searching start dates
    /// from `today` through the end of the horizon.
    ///
    /// Returns [`TripError::NoWindow`] when the duration does not fit
    /// the horizon at all; in that case no signal is ever queried.
    #[instrument(skip(self, request), fields(destinations = ?request.destinations, duration_days = request.duration_days))]
    pub async fn recommend(
        &self,
        request: &TripRequest,
        today: NaiveDate,
    ) -> Result<Recommendation> {
        let Some(max_days_ahead) = self.horizon_days.checked_sub(request.duration_days) else {
            return Err(TripError::NoWindow);
        };

        let destinations: Vec<ResolvedLocation> = request
            .destinations
            .iter()
            .map(|name| location_resolver::resolve(name))
            .collect();

        let horizon = DateWindow::from_duration(today, self.horizon_days);
        let mut scorer = DestinationScorer::new(self.weather, self.store, horizon);

        let mut best: Option<ScoredWindow> = None;
        for days_ahead in 0..=max_days_ahead {
            let start = today + Duration::days(i64::from(days_ahead));
            let window = DateWindow::from_duration(start, request.duration_days);

            let mut total = BASE_SCORE;
            let mut reasons = Vec::with_capacity(destinations.len() * 3);
            for destination in &destinations {
                let score = scorer.score(destination, &window).await?;
                total -= score.penalty;
                reasons.extend(score.reasons);
            }
            let total = total.max(0.0);
            debug!(start = %window.start, score = total, "Scored candidate window");

            // Strict comparison: the earliest window wins ties
            if best.as_ref().is_none_or(|b| total > b.total_score) {
                best = Some(ScoredWindow {
                    window,
                    total_score: total,
                    reasons,
                });
            }
        }

        let best = best.ok_or(TripError::NoWindow)?;
        debug!(start = %best.window.start, score = best.total_score, "Selected best window");

        Ok(Recommendation {
            destinations: request.destinations.clone(),
            duration_days: request.duration_days,
            best_window: best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClosureRecord;
    use crate::scoring::testing::ScriptedWeather;
    use crate::store::MemoryStore;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // A Monday, so weekday-based traffic fixtures are predictable
    fn today() -> NaiveDate {
        date(2026, 8, 10)
    }

    fn request(destinations: &[&str], duration_days: u32) -> TripRequest {
        TripRequest {
            destinations: destinations.iter().map(|d| d.to_string()).collect(),
            duration_days,
        }
    }

    fn closure(location: &str, start: NaiveDate, end: NaiveDate) -> ClosureRecord {
        ClosureRecord {
            location: location.to_string(),
            start_date: start,
            end_date: end,
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_perfect_conditions_score_ten_and_pick_the_earliest_start() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search.recommend(&request(&["Coorg"], 3), today()).await.unwrap();
        let best = &recommendation.best_window;

        // All 28 candidates tie at 10.0; strict comparison keeps the first
        assert_eq!(best.total_score, 10.0);
        assert_eq!(best.window.start, today());
        assert_eq!(best.window.end, date(2026, 8, 12));
        assert_eq!(best.reasons.len(), 3);
    }

    #[tokio::test]
    async fn test_two_destinations_give_six_ordered_reasons() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search
            .recommend(&request(&["Chikmagalur", "Coorg"], 2), today())
            .await
            .unwrap();
        let reasons = &recommendation.best_window.reasons;

        assert_eq!(recommendation.best_window.total_score, 10.0);
        assert_eq!(reasons.len(), 6);
        assert_eq!(reasons[0], "Good weather in Chikmagalur");
        assert_eq!(reasons[1], "No road closures in Chikmagalur");
        assert_eq!(reasons[2], "Manageable traffic in Chikmagalur");
        assert_eq!(reasons[3], "Good weather in Coorg");
        assert_eq!(reasons[4], "No road closures in Coorg");
        assert_eq!(reasons[5], "Manageable traffic in Coorg");
    }

    #[tokio::test]
    async fn test_closure_spanning_the_horizon_costs_exactly_three() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        store.add_closure(closure("Coorg", date(2026, 8, 1), date(2026, 12, 31)));
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search.recommend(&request(&["Coorg"], 3), today()).await.unwrap();
        let best = &recommendation.best_window;

        // Weather and traffic neutral, so every candidate is 10.0 - 3.0
        assert_eq!(best.total_score, 7.0);
        assert_eq!(best.window.start, today());
        assert_eq!(best.reasons[1], "Road closures in Coorg");
    }

    #[tokio::test]
    async fn test_search_skips_past_a_blocked_start() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        // Blocks only windows touching the first day of the horizon
        store.add_closure(closure("Coorg", date(2026, 8, 10), date(2026, 8, 10)));
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search.recommend(&request(&["Coorg"], 3), today()).await.unwrap();
        let best = &recommendation.best_window;

        assert_eq!(best.total_score, 10.0);
        assert_eq!(best.window.start, date(2026, 8, 11));
    }

    #[tokio::test]
    async fn test_score_is_clamped_at_zero() {
        // Storms every day: 3-day window costs 3 * (1.0 + 2.0) plus
        // closures, far beyond the base score
        let mut weather = ScriptedWeather::clear();
        for offset in 0..30i64 {
            weather = weather.with_day(
                "Coorg",
                today() + Duration::days(offset),
                Some(20.0),
                Some(99),
            );
        }
        let store = MemoryStore::new();
        store.add_closure(closure("Coorg", date(2026, 8, 1), date(2026, 12, 31)));
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search.recommend(&request(&["Coorg"], 5), today()).await.unwrap();
        assert_eq!(recommendation.best_window.total_score, 0.0);
    }

    #[tokio::test]
    async fn test_duration_beyond_horizon_finds_no_window() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        let search = WindowSearch::new(&weather, &store);

        let err = search.recommend(&request(&["Coorg"], 31), today()).await.unwrap_err();
        assert!(matches!(err, TripError::NoWindow));
        // rejected before any signal was queried
        assert_eq!(weather.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duration_equal_to_horizon_has_one_candidate() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        let search = WindowSearch::new(&weather, &store);

        let recommendation = search.recommend(&request(&["Coorg"], 30), today()).await.unwrap();
        assert_eq!(recommendation.best_window.window.start, today());
        assert_eq!(recommendation.best_window.window.end, date(2026, 9, 8));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_recommendations() {
        let weather = ScriptedWeather::clear()
            .with_day("Coorg", date(2026, 8, 14), Some(6.0), Some(63))
            .with_day("Coorg", date(2026, 8, 20), Some(1.0), Some(95));
        let store = MemoryStore::new();
        store.set_traffic("Coorg", Weekday::Sat, 9.0);
        store.add_closure(closure("Coorg", date(2026, 8, 25), date(2026, 8, 27)));
        let search = WindowSearch::new(&weather, &store);

        let first = search.recommend(&request(&["Coorg"], 4), today()).await.unwrap();
        let second = search.recommend(&request(&["Coorg"], 4), today()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal_for_the_request() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::failing();
        let search = WindowSearch::new(&weather, &store);

        let err = search.recommend(&request(&["Coorg"], 3), today()).await.unwrap_err();
        assert!(matches!(err, TripError::Store { .. }));
    }

    #[tokio::test]
    async fn test_weather_is_fetched_once_per_destination_per_search() {
        let weather = ScriptedWeather::clear();
        let store = MemoryStore::new();
        let search = WindowSearch::new(&weather, &store);

        search
            .recommend(&request(&["Chikmagalur", "Coorg"], 3), today())
            .await
            .unwrap();
        // 28 candidates, 2 destinations, one horizon fetch each
        assert_eq!(weather.call_count(), 2);
    }
}
