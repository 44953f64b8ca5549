//! Location Resolution Module
//!
//! Resolves destination names into coordinates for weather lookup.
//! Known destinations come from a static table; anything else gets the
//! default coordinates with an explicit `approximate` flag so the
//! substitution stays visible downstream instead of silently standing
//! in for the real place.

use crate::models::ResolvedLocation;
use tracing::{debug, warn};

/// Known destination coordinates (name, latitude, longitude)
const KNOWN_COORDINATES: &[(&str, f64, f64)] = &[
    ("Chikmagalur", 13.32, 75.77),
    ("Coorg", 12.34, 75.81),
    ("Sakleshpur", 12.94, 75.78),
];

/// Default coordinates (Bangalore) used for unknown destinations
const DEFAULT_COORDINATES: (f64, f64) = (12.97, 77.59);

/// Resolve a destination name to coordinates.
///
/// Unknown names resolve to [`DEFAULT_COORDINATES`] and are flagged
/// `approximate`; lookups are exact-match on the name.
#[must_use]
pub fn resolve(name: &str) -> ResolvedLocation {
    if let Some((_, latitude, longitude)) = KNOWN_COORDINATES
        .iter()
        .find(|(known, _, _)| *known == name)
    {
        let location = ResolvedLocation::new(name.to_string(), *latitude, *longitude);
        debug!("Resolved {} to ({})", name, location.format_coordinates());
        return location;
    }

    let (latitude, longitude) = DEFAULT_COORDINATES;
    let location = ResolvedLocation::approximate(name.to_string(), latitude, longitude);
    warn!(
        "No coordinates for {:?}, using default ({})",
        name,
        location.format_coordinates()
    );
    location
}
