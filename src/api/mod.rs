use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TripError;
use crate::models::Recommendation;
use crate::parse;
use crate::scoring::WindowSearch;
use crate::store::TravelStore;
use crate::weather::WeatherProvider;

/// Shared handles the request handlers need. Signals are injected as
/// trait objects so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TravelStore>,
    pub weather: Arc<dyn WeatherProvider>,
    pub horizon_days: u32,
}

#[derive(Serialize, Deserialize)]
pub struct TravelRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct TravelResponse {
    pub destinations: Vec<String>,
    pub duration_days: u32,
    pub best_window: BestWindow,
}

#[derive(Serialize, Deserialize)]
pub struct BestWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rounded to one decimal for presentation; comparisons upstream
    /// use the raw value
    pub score: f64,
    pub reasons: Vec<String>,
}

impl From<Recommendation> for TravelResponse {
    fn from(recommendation: Recommendation) -> Self {
        let best = recommendation.best_window;
        Self {
            destinations: recommendation.destinations,
            duration_days: recommendation.duration_days,
            best_window: BestWindow {
                start_date: best.window.start,
                end_date: best.window.end,
                score: (best.total_score * 10.0).round() / 10.0,
                reasons: best.reasons,
            },
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/travel/recommend", post(recommend_travel))
        .with_state(state)
}

async fn recommend_travel(
    State(state): State<AppState>,
    Json(request): Json<TravelRequest>,
) -> Result<Json<TravelResponse>, ApiError> {
    let trip = parse::parse_message(&request.message)?;

    let search = WindowSearch::new(state.weather.as_ref(), state.store.as_ref())
        .with_horizon(state.horizon_days);
    let recommendation = search.recommend(&trip, Local::now().date_naive()).await?;

    Ok(Json(recommendation.into()))
}

/// Maps domain errors onto transport status codes with a JSON
/// `{"detail": ...}` body.
pub struct ApiError(TripError);

impl From<TripError> for ApiError {
    fn from(err: TripError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (
            status,
            Json(serde_json::json!({ "detail": self.0.to_string() })),
        )
            .into_response()
    }
}
