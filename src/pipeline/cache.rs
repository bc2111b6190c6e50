use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::Dataset;
use crate::pipeline::normalize::NormalizeReport;

/// A normalized dataset together with how and when it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub report: NormalizeReport,
    pub origin: String,
    pub fetched_at: DateTime<Utc>,
}

struct CacheEntry {
    snapshot: Arc<LoadedDataset>,
    stored_at: Instant,
}

/// Single-slot, time-boxed cache of the last loaded dataset.
///
/// Snapshots are immutable and handed out as `Arc`s. The lock is never held
/// while loading, so concurrent reloads may both fetch; the last store wins.
pub struct DatasetCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// The cached snapshot if it is younger than the TTL.
    pub fn get(&self) -> Option<Arc<LoadedDataset>> {
        let slot = self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = slot.as_ref()?;
        let age = entry.stored_at.elapsed();
        if age < self.ttl {
            Some(entry.snapshot.clone())
        } else {
            debug!(age_secs = age.as_secs(), "Cached dataset expired");
            None
        }
    }

    pub fn store(&self, snapshot: LoadedDataset) -> Arc<LoadedDataset> {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(CacheEntry {
            snapshot: snapshot.clone(),
            stored_at: Instant::now(),
        });
        snapshot
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}
