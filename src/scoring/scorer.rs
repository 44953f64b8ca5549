//! Per-destination scoring: three independent signals folded into a
//! penalty and one reason apiece.

use crate::Result;
use crate::models::{DateWindow, ForecastDay, ResolvedLocation};
use crate::store::TravelStore;
use crate::weather::WeatherProvider;
use chrono::Datelike;
use std::collections::HashMap;

/// Precipitation above this many millimetres makes a day rainy
pub const RAIN_THRESHOLD_MM: f64 = 0.5;
/// Severe thunderstorm weather codes
pub const STORM_CODES: [i32; 3] = [95, 96, 99];
pub const RAIN_DAY_PENALTY: f64 = 1.0;
pub const STORM_DAY_PENALTY: f64 = 2.0;
pub const CLOSURE_PENALTY: f64 = 3.0;
/// Average congestion above this level starts to cost score
pub const TRAFFIC_THRESHOLD: f64 = 7.0;
pub const TRAFFIC_PENALTY_WEIGHT: f64 = 0.5;
/// Congestion score assumed for days with no persisted record
pub const DEFAULT_TRAFFIC_SCORE: f64 = 5.0;

/// Partial result for one destination over one window
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationScore {
    /// Non-negative total deduction from the base score
    pub penalty: f64,
    /// Exactly one reason per signal: weather, closures, traffic
    pub reasons: [String; 3],
}

/// Scores one destination at a time against a window.
///
/// Holds a per-search forecast memo: the weather provider is asked
/// once per location for the whole horizon and every candidate window
/// is served from that by-date map, so overlapping windows never
/// refetch the same days.
pub struct DestinationScorer<'a> {
    weather: &'a dyn WeatherProvider,
    store: &'a dyn TravelStore,
    horizon: DateWindow,
    forecasts: HashMap<String, Option<HashMap<chrono::NaiveDate, ForecastDay>>>,
}

impl<'a> DestinationScorer<'a> {
    pub fn new(
        weather: &'a dyn WeatherProvider,
        store: &'a dyn TravelStore,
        horizon: DateWindow,
    ) -> Self {
        Self {
            weather,
            store,
            horizon,
            forecasts: HashMap::new(),
        }
    }

    /// Score `destination` over `window`: weather, closure and traffic
    /// penalties summed, with one reason each in that order.
    pub async fn score(
        &mut self,
        destination: &ResolvedLocation,
        window: &DateWindow,
    ) -> Result<DestinationScore> {
        let forecast = self.window_forecast(destination, window).await;
        let (weather_penalty, weather_reason) = weather_penalty(forecast.as_deref(), destination);
        let (closure_penalty, closure_reason) = self.closure_penalty(destination, window).await?;
        let (traffic_penalty, traffic_reason) = self.traffic_penalty(destination, window).await?;

        Ok(DestinationScore {
            penalty: weather_penalty + closure_penalty + traffic_penalty,
            reasons: [weather_reason, closure_reason, traffic_reason],
        })
    }

    /// Forecast days covering `window`, from the memoized horizon
    /// fetch. Days the provider did not report come back with empty
    /// fields ("no data", not zero). `None` when the provider was
    /// unavailable for this location.
    async fn window_forecast(
        &mut self,
        destination: &ResolvedLocation,
        window: &DateWindow,
    ) -> Option<Vec<ForecastDay>> {
        if !self.forecasts.contains_key(&destination.name) {
            let horizon = self.horizon;
            let fetched = self
                .weather
                .daily_forecast(destination, &horizon)
                .await
                .map(|days| {
                    days.into_iter()
                        .map(|day| (day.date, day))
                        .collect::<HashMap<_, _>>()
                });
            self.forecasts.insert(destination.name.clone(), fetched);
        }

        let by_date = self.forecasts.get(&destination.name)?.as_ref()?;
        Some(
            window
                .days()
                .map(|date| {
                    by_date.get(&date).cloned().unwrap_or(ForecastDay {
                        date,
                        precipitation_mm: None,
                        weather_code: None,
                    })
                })
                .collect(),
        )
    }

    async fn closure_penalty(
        &self,
        destination: &ResolvedLocation,
        window: &DateWindow,
    ) -> Result<(f64, String)> {
        let conflicts = self
            .store
            .closures_overlapping(&destination.name, window)
            .await?;

        if conflicts.is_empty() {
            Ok((0.0, format!("No road closures in {}", destination.name)))
        } else {
            Ok((CLOSURE_PENALTY, format!("Road closures in {}", destination.name)))
        }
    }

    async fn traffic_penalty(
        &self,
        destination: &ResolvedLocation,
        window: &DateWindow,
    ) -> Result<(f64, String)> {
        let mut total = 0.0;
        for date in window.days() {
            let score = self
                .store
                .traffic_score(&destination.name, date.weekday())
                .await?
                .unwrap_or(DEFAULT_TRAFFIC_SCORE);
            total += score;
        }

        // Windows always span at least one day
        let average = total / f64::from(window.len_days());
        if average > TRAFFIC_THRESHOLD {
            Ok((
                (average - TRAFFIC_THRESHOLD) * TRAFFIC_PENALTY_WEIGHT,
                format!("High traffic in {}", destination.name),
            ))
        } else {
            Ok((0.0, format!("Manageable traffic in {}", destination.name)))
        }
    }
}

/// Weather penalty and reason for a window's forecast. Unavailable
/// forecasts cost nothing; the reason records the gap instead.
fn weather_penalty(
    forecast: Option<&[ForecastDay]>,
    destination: &ResolvedLocation,
) -> (f64, String) {
    let suffix = if destination.approximate {
        " (approximate location)"
    } else {
        ""
    };

    let Some(days) = forecast else {
        return (
            0.0,
            format!("Weather data unavailable for {}{}", destination.name, suffix),
        );
    };

    let rain_days = days
        .iter()
        .filter(|day| day.precipitation_mm.is_some_and(|mm| mm > RAIN_THRESHOLD_MM))
        .count();
    let storm_days = days
        .iter()
        .filter(|day| day.weather_code.is_some_and(|code| STORM_CODES.contains(&code)))
        .count();

    let penalty = rain_days as f64 * RAIN_DAY_PENALTY + storm_days as f64 * STORM_DAY_PENALTY;

    let reason = if rain_days == 0 && storm_days == 0 {
        format!("Good weather in {}{}", destination.name, suffix)
    } else {
        let mut counts = Vec::new();
        if rain_days > 0 {
            counts.push(count_phrase(rain_days, "rainy"));
        }
        if storm_days > 0 {
            counts.push(count_phrase(storm_days, "stormy"));
        }
        format!(
            "{} in {}{}",
            counts.join(" and "),
            destination.name,
            suffix
        )
    };

    (penalty, reason)
}

fn count_phrase(count: usize, adjective: &str) -> String {
    let noun = if count == 1 { "day" } else { "days" };
    format!("{count} {adjective} {noun}")
}
