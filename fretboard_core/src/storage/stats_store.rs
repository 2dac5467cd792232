use fretboard_data::{validate_stats, StatsRecord};
use tracing::{info, warn};

use super::{Storage, StorageError, STATS_KEY};

/// Loads and writes through the persisted `StatsRecord`.
#[derive(Debug, Clone)]
pub struct StatsStore<S> {
    storage: S,
}

impl<S: Storage> StatsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Never fails: missing or corrupt data yields the seeded default,
    /// damaged fields are defaulted individually.
    pub fn load(&self) -> StatsRecord {
        let raw = match self.storage.get(STATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StatsRecord::default(),
            Err(e) => {
                warn!(error = %e, "stats read failed, using defaults");
                return StatsRecord::default();
            }
        };

        let validated = validate_stats(&raw);
        if !validated.is_clean() {
            warn!(fields = ?validated.defaulted, "stats record partially defaulted");
        }
        validated.record
    }

    /// Best-effort write; failures are logged and swallowed.
    pub fn save(&self, record: &StatsRecord) {
        if let Err(e) = self.try_save(record) {
            warn!(error = %e, "stats write failed, keeping in-memory record");
        }
    }

    fn try_save(&self, record: &StatsRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record).map_err(|source| StorageError::Serialize {
            key: STATS_KEY.to_string(),
            source,
        })?;
        self.storage.set(STATS_KEY, &json)
    }

    /// Drops the persisted stats; the next `load` seeds the default.
    pub fn reset(&self) -> StatsRecord {
        match self.storage.remove(STATS_KEY) {
            Ok(()) => info!("stats reset"),
            Err(e) => warn!(error = %e, "stats reset failed to clear storage"),
        }
        StatsRecord::default()
    }
}
