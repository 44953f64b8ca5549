//! Location model for destinations resolved to geographic coordinates

use serde::{Deserialize, Serialize};

/// A destination name resolved to coordinates for weather lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Destination name as given in the request
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// True when the name was not in the coordinate table and the
    /// default coordinates were substituted
    pub approximate: bool,
}

impl ResolvedLocation {
    /// Create a location with exact, known coordinates
    #[must_use]
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
            approximate: false,
        }
    }

    /// Create a location carrying substituted default coordinates
    #[must_use]
    pub fn approximate(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
            approximate: true,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
