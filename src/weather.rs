use crate::config::WeatherConfig;
use crate::error::TripError;
use crate::models::{DateWindow, ForecastDay, ResolvedLocation};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{instrument, warn};

/// Source of daily forecast data for a location and date range.
///
/// `None` means the forecast is unavailable (transport failure,
/// non-success status, undecodable body); unavailability is a scoring
/// input, never an error.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn daily_forecast(
        &self,
        location: &ResolvedLocation,
        window: &DateWindow,
    ) -> Option<Vec<ForecastDay>>;
}

/// Open-Meteo forecast client. Every call is attempted exactly once;
/// there are no retries in the signal layer.
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(|e| TripError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(location = %location.name))]
    async fn daily_forecast(
        &self,
        location: &ResolvedLocation,
        window: &DateWindow,
    ) -> Option<Vec<ForecastDay>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily=precipitation_sum,weathercode&start_date={}&end_date={}",
            self.base_url, location.latitude, location.longitude, window.start, window.end
        );

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Forecast request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Forecast request rejected");
            return None;
        }

        let body: openmeteo::ForecastResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse OpenMeteo forecast response: {}", e);
                return None;
            }
        };

        let Some(daily) = body.daily else {
            warn!("OpenMeteo forecast response carried no daily block");
            return None;
        };

        Some(openmeteo::to_forecast_days(&daily))
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use crate::models::ForecastDay;
    use chrono::NaiveDate;
    use serde::Deserialize;

    /// Daily forecast response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub daily: Option<DailyData>,
    }

    /// Daily weather data from `OpenMeteo`; a `null` series entry
    /// means no data for that day.
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "precipitation_sum")]
        pub precipitation: Option<Vec<Option<f64>>>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<Vec<Option<i32>>>,
    }

    /// Convert the daily series into per-day forecast entries,
    /// dropping entries whose date fails to parse.
    pub fn to_forecast_days(daily: &DailyData) -> Vec<ForecastDay> {
        daily
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, time)| {
                let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").ok()?;
                Some(ForecastDay {
                    date,
                    precipitation_mm: series_value(&daily.precipitation, i),
                    weather_code: series_value(&daily.weather_code, i),
                })
            })
            .collect()
    }

    fn series_value<T: Copy>(series: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
        series
            .as_ref()
            .and_then(|values| values.get(index).copied().flatten())
    }
}
