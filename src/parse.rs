//! Free-text trip request parsing
//!
//! Requests look like "travel to Chikmagalur, Coorg for 4 days"
//! (case-insensitive). The destination list keeps its original casing;
//! the first ` for <digits> days` occurrence after the destination
//! list terminates it, so destination names may themselves contain
//! the word "for".

use crate::Result;
use crate::error::TripError;
use crate::models::TripRequest;

const REQUEST_PREFIX: &str = "travel to ";
const FOR_SEPARATOR: &str = " for ";
const DAYS_SUFFIX: &str = " days";

const MAX_DESTINATIONS: usize = 3;

/// Parse a free-text message into a [`TripRequest`].
///
/// Rejects messages that do not match the request pattern, durations
/// below one day, and destination counts outside 1..=3.
pub fn parse_message(message: &str) -> Result<TripRequest> {
    let (destination_list, duration_days) =
        match_request(message).ok_or_else(|| TripError::parse("Invalid message format"))?;

    let destinations: Vec<String> = destination_list
        .split(',')
        .map(|d| d.trim().to_string())
        .collect();

    if destinations.is_empty() || destinations.len() > MAX_DESTINATIONS {
        return Err(TripError::parse("1-3 destinations required"));
    }

    if duration_days < 1 {
        return Err(TripError::parse("Duration must be at least 1 day"));
    }

    Ok(TripRequest {
        destinations,
        duration_days,
    })
}

/// Locate `travel to <destinations> for <digits> days` in the message
/// and return the destination slice plus the parsed duration.
fn match_request(message: &str) -> Option<(&str, u32)> {
    let prefix_at = find_ascii_ci(message, REQUEST_PREFIX, 0)?;
    let destinations_start = prefix_at + REQUEST_PREFIX.len();

    // Earliest separator that is followed by a duration wins, and the
    // destination slice must be non-empty.
    let mut from = destinations_start;
    while let Some(separator_at) = find_ascii_ci(message, FOR_SEPARATOR, from) {
        if separator_at > destinations_start {
            let rest = &message[separator_at + FOR_SEPARATOR.len()..];
            if let Some(duration) = match_duration(rest) {
                return Some((&message[destinations_start..separator_at], duration));
            }
        }
        from = separator_at + 1;
    }
    None
}

/// Match `<digits> days` at the start of `rest`.
fn match_duration(rest: &str) -> Option<u32> {
    let digits_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }

    let suffix = &rest.as_bytes()[digits_len..];
    if suffix.len() < DAYS_SUFFIX.len()
        || !suffix[..DAYS_SUFFIX.len()].eq_ignore_ascii_case(DAYS_SUFFIX.as_bytes())
    {
        return None;
    }

    rest[..digits_len].parse().ok()
}

/// ASCII case-insensitive substring search starting at byte offset
/// `from`. The needle must be ASCII; returned offsets are always char
/// boundaries because the match starts with an ASCII byte.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes().get(from..)?;
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|at| at + from)
}
