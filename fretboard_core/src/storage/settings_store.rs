use fretboard_data::{validate_settings, Dimension, SettingsRecord};
use tracing::{debug, warn};

use super::{Storage, StorageError, SETTINGS_KEY};

/// Loads and writes through the persisted `SettingsRecord`.
///
/// The mutators apply the change to `record` and persist it; a rejected
/// change (disabling the last enabled entry, out-of-range index) returns
/// `false` and writes nothing.
#[derive(Debug, Clone)]
pub struct SettingsStore<S> {
    storage: S,
}

impl<S: Storage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> SettingsRecord {
        let raw = match self.storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SettingsRecord::default(),
            Err(e) => {
                warn!(error = %e, "settings read failed, using defaults");
                return SettingsRecord::default();
            }
        };

        let validated = validate_settings(&raw);
        if !validated.is_clean() {
            warn!(fields = ?validated.defaulted, "settings record partially defaulted");
        }
        validated.record
    }

    pub fn save(&self, record: &SettingsRecord) {
        if let Err(e) = self.try_save(record) {
            warn!(error = %e, "settings write failed, keeping in-memory record");
        }
    }

    fn try_save(&self, record: &SettingsRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record).map_err(|source| StorageError::Serialize {
            key: SETTINGS_KEY.to_string(),
            source,
        })?;
        self.storage.set(SETTINGS_KEY, &json)
    }

    pub fn set_fret(&self, record: &mut SettingsRecord, index: usize, enabled: bool) -> bool {
        self.apply(record, |r| r.set_fret(index, enabled))
    }

    pub fn set_string(&self, record: &mut SettingsRecord, index: usize, enabled: bool) -> bool {
        self.apply(record, |r| r.set_string(index, enabled))
    }

    pub fn select_all(&self, record: &mut SettingsRecord, dimension: Dimension) {
        self.apply(record, |r| {
            r.select_all(dimension);
            true
        });
    }

    pub fn select_none(&self, record: &mut SettingsRecord, dimension: Dimension) {
        self.apply(record, |r| {
            r.select_none(dimension);
            true
        });
    }

    fn apply(
        &self,
        record: &mut SettingsRecord,
        change: impl FnOnce(&mut SettingsRecord) -> bool,
    ) -> bool {
        if !change(record) {
            debug!("settings change rejected");
            return false;
        }
        self.save(record);
        true
    }
}
