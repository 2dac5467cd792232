pub mod model;
pub mod settings;
pub mod stats;

pub use model::{string_name, Note, ParseNoteError, PitchClass, Position, FRET_COUNT, STRING_COUNT};
pub use settings::{validate_settings, Dimension, ParseDimensionError, SettingsRecord};
pub use stats::{validate_stats, FretRow, NoteRow, StatsRecord, StatsSummary, Tally};

/// A record recovered from storage, plus the fields that had to be defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub record: T,
    pub defaulted: Vec<String>,
}

impl<T> Validated<T> {
    pub fn new(record: T) -> Self {
        Self {
            record,
            defaulted: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// `round(correct / total * 100)`, or 0 with no attempts.
pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}
