//! Data models for the tripwindow service
//!
//! This module contains the core domain models organized by concern:
//! - Location: destination names resolved to geographic coordinates
//! - Trip: requests, date windows, signal records and recommendations

pub mod location;
pub mod trip;

// Re-export all public types for convenient access
pub use location::ResolvedLocation;
pub use trip::{
    ClosureRecord, DateWindow, ForecastDay, Recommendation, ScoredWindow, TrafficRecord,
    TripRequest,
};
