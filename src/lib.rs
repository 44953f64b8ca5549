//! `tripwindow` - travel window recommendation service
//!
//! This library scores every candidate start date in a lookahead
//! horizon by combining weather risk, road-closure conflicts and
//! traffic patterns, and recommends the best travel window for a
//! free-text trip request.

pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod parse;
pub mod scoring;
pub mod store;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::AppConfig;
pub use error::TripError;
pub use models::{DateWindow, ForecastDay, Recommendation, ScoredWindow, TripRequest};
pub use scoring::{DestinationScorer, WindowSearch};
pub use store::{FjallStore, MemoryStore, TravelStore};
pub use weather::{OpenMeteoClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
