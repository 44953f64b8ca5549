//! Window scoring and search
//!
//! The core decision logic: every candidate start date in the horizon
//! is scored by combining three signals per destination (weather,
//! road closures, traffic) and the best-scoring window wins, earliest
//! first on ties.

mod scorer;
mod search;

pub use scorer::{DestinationScore, DestinationScorer};
pub use search::{BASE_SCORE, DEFAULT_HORIZON_DAYS, WindowSearch};

#[cfg(test)]
pub(crate) mod testing;
