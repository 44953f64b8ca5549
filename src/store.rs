//! Persisted road-closure and traffic records
//!
//! Scoring reaches persistence through the [`TravelStore`] trait so a
//! request carries an injected handle instead of a global session.
//! [`FjallStore`] is the durable implementation; [`MemoryStore`] is an
//! in-process double for tests and offline runs. The trait surface is
//! read-only; writes are inherent methods on the concrete stores.

use crate::Result;
use crate::error::TripError;
use crate::models::{ClosureRecord, DateWindow, TrafficRecord};
use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use fjall::Keyspace;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tokio::task;
use tracing::info;

/// Read-only queries the signals need. A store failure is fatal for
/// the request; there is no fallback value.
#[async_trait]
pub trait TravelStore: Send + Sync {
    /// Closures for `location` whose interval overlaps the window
    /// (inclusive at both ends).
    async fn closures_overlapping(
        &self,
        location: &str,
        window: &DateWindow,
    ) -> Result<Vec<ClosureRecord>>;

    /// Persisted congestion score for (location, weekday), if any.
    async fn traffic_score(&self, location: &str, weekday: Weekday) -> Result<Option<f64>>;
}

const SEEDED_KEY: &[u8] = b"seeded";

fn closures_key(location: &str) -> Vec<u8> {
    format!("closures:{location}").into_bytes()
}

fn traffic_key(location: &str, day_of_week: u8) -> Vec<u8> {
    format!("traffic:{location}:{day_of_week}").into_bytes()
}

fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

/// Durable store backed by a fjall keyspace with postcard-encoded
/// values. Blocking keyspace calls run on the blocking pool.
pub struct FjallStore {
    store: Keyspace,
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| TripError::store(format!("Failed to open store database: {e}")))?;
        let records = db
            .keyspace("records", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| TripError::store(format!("Failed to open records keyspace: {e}")))?;
        Ok(FjallStore { store: records })
    }

    async fn get_raw(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        task::spawn_blocking(move || store.get(key).map(|value| value.map(|v| v.to_vec())))
            .await
            .map_err(|e| TripError::store(e.to_string()))?
            .map_err(|e| TripError::store(e.to_string()))
    }

    async fn put_raw(&self, key: Vec<u8>, bytes: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| TripError::store(e.to_string()))?
            .map_err(|e| TripError::store(e.to_string()))?;
        Ok(())
    }

    /// Replace the closure set persisted for a location.
    pub async fn put_closures(&self, location: &str, closures: &[ClosureRecord]) -> Result<()> {
        let bytes =
            postcard::to_stdvec(closures).map_err(|e| TripError::store(e.to_string()))?;
        self.put_raw(closures_key(location), bytes).await
    }

    /// Persist the congestion record for its (location, weekday) slot.
    pub async fn put_traffic(&self, record: &TrafficRecord) -> Result<()> {
        let bytes = postcard::to_stdvec(record).map_err(|e| TripError::store(e.to_string()))?;
        self.put_raw(traffic_key(&record.location, record.day_of_week), bytes)
            .await
    }

    /// True once [`seed_demo`] has run against this store.
    pub async fn is_seeded(&self) -> Result<bool> {
        Ok(self.get_raw(SEEDED_KEY.to_vec()).await?.is_some())
    }

    async fn mark_seeded(&self) -> Result<()> {
        let bytes = postcard::to_stdvec(&true).map_err(|e| TripError::store(e.to_string()))?;
        self.put_raw(SEEDED_KEY.to_vec(), bytes).await
    }
}

#[async_trait]
impl TravelStore for FjallStore {
    async fn closures_overlapping(
        &self,
        location: &str,
        window: &DateWindow,
    ) -> Result<Vec<ClosureRecord>> {
        let Some(bytes) = self.get_raw(closures_key(location)).await? else {
            return Ok(Vec::new());
        };
        let records: Vec<ClosureRecord> =
            postcard::from_bytes(&bytes).map_err(|e| TripError::store(e.to_string()))?;
        Ok(records
            .into_iter()
            .filter(|record| record.conflicts_with(window))
            .collect())
    }

    async fn traffic_score(&self, location: &str, weekday: Weekday) -> Result<Option<f64>> {
        let Some(bytes) = self
            .get_raw(traffic_key(location, weekday_index(weekday)))
            .await?
        else {
            return Ok(None);
        };
        let record: TrafficRecord =
            postcard::from_bytes(&bytes).map_err(|e| TripError::store(e.to_string()))?;
        Ok(Some(record.score))
    }
}

/// In-memory store used as a test double and for offline runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
    fail: bool,
}

#[derive(Default)]
struct MemoryInner {
    closures: HashMap<String, Vec<ClosureRecord>>,
    traffic: HashMap<(String, u8), TrafficRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails, for exercising the fatal
    /// persistence path.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            inner: Mutex::default(),
            fail: true,
        }
    }

    pub fn add_closure(&self, closure: ClosureRecord) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .closures
            .entry(closure.location.clone())
            .or_default()
            .push(closure);
    }

    pub fn set_traffic(&self, location: &str, weekday: Weekday, score: f64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let day_of_week = weekday_index(weekday);
        inner.traffic.insert(
            (location.to_string(), day_of_week),
            TrafficRecord {
                location: location.to_string(),
                day_of_week,
                score,
            },
        );
    }
}

#[async_trait]
impl TravelStore for MemoryStore {
    async fn closures_overlapping(
        &self,
        location: &str,
        window: &DateWindow,
    ) -> Result<Vec<ClosureRecord>> {
        if self.fail {
            return Err(TripError::store("store unavailable"));
        }
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .closures
            .get(location)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.conflicts_with(window))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn traffic_score(&self, location: &str, weekday: Weekday) -> Result<Option<f64>> {
        if self.fail {
            return Err(TripError::store("store unavailable"));
        }
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .traffic
            .get(&(location.to_string(), weekday_index(weekday)))
            .map(|record| record.score))
    }
}

/// Seed the demo dataset: closures and weekday traffic patterns for
/// three hill towns. Idempotent via a seeded marker key.
pub async fn seed_demo(store: &FjallStore) -> Result<()> {
    if store.is_seeded().await? {
        return Ok(());
    }

    let closures = [
        ("Chikmagalur", (2025, 8, 15), (2025, 8, 17), "Maintenance"),
        ("Coorg", (2025, 8, 20), (2025, 8, 22), "Festival"),
        ("Sakleshpur", (2025, 8, 25), (2025, 8, 26), "Construction"),
    ];
    for (location, start, end, reason) in closures {
        let record = ClosureRecord {
            location: location.to_string(),
            start_date: demo_date(start),
            end_date: demo_date(end),
            reason: Some(reason.to_string()),
        };
        store.put_closures(location, &[record]).await?;
    }

    for location in ["Chikmagalur", "Coorg", "Sakleshpur"] {
        for day_of_week in 0..7u8 {
            let record = TrafficRecord {
                location: location.to_string(),
                day_of_week,
                score: (5.0 + f64::from(day_of_week % 3) * 1.5).min(10.0),
            };
            store.put_traffic(&record).await?;
        }
    }

    store.mark_seeded().await?;
    info!("Seeded demo closures and traffic patterns");
    Ok(())
}

fn demo_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}
