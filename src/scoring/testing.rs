//! Scripted signal doubles for scoring tests

use crate::models::{DateWindow, ForecastDay, ResolvedLocation};
use crate::weather::WeatherProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Mode {
    /// Every day defaults to dry, calm weather
    Clear,
    /// The provider answers but reports no days
    Empty,
    /// The provider cannot be reached
    Unavailable,
}

/// Deterministic in-process weather provider. Days not scripted with
/// [`with_day`](Self::with_day) default according to the mode.
pub(crate) struct ScriptedWeather {
    mode: Mode,
    days: HashMap<(String, NaiveDate), (Option<f64>, Option<i32>)>,
    calls: AtomicUsize,
}

impl ScriptedWeather {
    pub fn clear() -> Self {
        Self::with_mode(Mode::Clear)
    }

    pub fn empty_response() -> Self {
        Self::with_mode(Mode::Empty)
    }

    pub fn unavailable() -> Self {
        Self::with_mode(Mode::Unavailable)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            days: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_day(
        mut self,
        location: &str,
        date: NaiveDate,
        precipitation_mm: Option<f64>,
        weather_code: Option<i32>,
    ) -> Self {
        self.days.insert(
            (location.to_string(), date),
            (precipitation_mm, weather_code),
        );
        self
    }

    /// Number of `daily_forecast` calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for ScriptedWeather {
    async fn daily_forecast(
        &self,
        location: &ResolvedLocation,
        window: &DateWindow,
    ) -> Option<Vec<ForecastDay>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.mode {
            Mode::Unavailable => None,
            Mode::Empty => Some(Vec::new()),
            Mode::Clear => Some(
                window
                    .days()
                    .map(|date| {
                        let (precipitation_mm, weather_code) = self
                            .days
                            .get(&(location.name.clone(), date))
                            .copied()
                            .unwrap_or((Some(0.0), Some(1)));
                        ForecastDay {
                            date,
                            precipitation_mm,
                            weather_code,
                        }
                    })
                    .collect(),
            ),
        }
    }
}
