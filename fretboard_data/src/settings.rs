use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{FRET_COUNT, STRING_COUNT};
use crate::Validated;

/// Which axis of the board a settings mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Frets,
    Strings,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Frets => f.write_str("frets"),
            Dimension::Strings => f.write_str("strings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected `frets` or `strings`, got `{0}`")]
pub struct ParseDimensionError(pub String);

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fret" | "frets" => Ok(Dimension::Frets),
            "string" | "strings" => Ok(Dimension::Strings),
            _ => Err(ParseDimensionError(s.to_string())),
        }
    }
}

/// Eligibility masks for quiz generation.
///
/// Every mutator keeps at least one entry enabled in each mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub frets: Vec<bool>,
    pub strings: Vec<bool>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            frets: vec![true; FRET_COUNT],
            strings: vec![true; STRING_COUNT],
        }
    }
}

impl SettingsRecord {
    pub fn mask(&self, dimension: Dimension) -> &[bool] {
        match dimension {
            Dimension::Frets => &self.frets,
            Dimension::Strings => &self.strings,
        }
    }

    fn mask_mut(&mut self, dimension: Dimension) -> &mut Vec<bool> {
        match dimension {
            Dimension::Frets => &mut self.frets,
            Dimension::Strings => &mut self.strings,
        }
    }

    /// Indices whose flag is set, ascending.
    pub fn eligible(&self, dimension: Dimension) -> Vec<u8> {
        self.mask(dimension)
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(|(i, _)| i as u8)
            .collect()
    }

    pub fn enabled_count(&self, dimension: Dimension) -> usize {
        self.mask(dimension).iter().filter(|&&on| on).count()
    }

    /// Returns `false` (and changes nothing) when the index is out of range
    /// or the change would disable the last enabled entry.
    pub fn set(&mut self, dimension: Dimension, index: usize, enabled: bool) -> bool {
        let enabled_count = self.enabled_count(dimension);
        let mask = self.mask_mut(dimension);
        let Some(current) = mask.get(index).copied() else {
            return false;
        };
        if current && !enabled && enabled_count == 1 {
            return false;
        }
        mask[index] = enabled;
        true
    }

    pub fn set_fret(&mut self, index: usize, enabled: bool) -> bool {
        self.set(Dimension::Frets, index, enabled)
    }

    pub fn set_string(&mut self, index: usize, enabled: bool) -> bool {
        self.set(Dimension::Strings, index, enabled)
    }

    pub fn select_all(&mut self, dimension: Dimension) {
        self.mask_mut(dimension).iter_mut().for_each(|on| *on = true);
    }

    /// Leaves only the first index enabled.
    pub fn select_none(&mut self, dimension: Dimension) {
        for (i, on) in self.mask_mut(dimension).iter_mut().enumerate() {
            *on = i == 0;
        }
    }
}

/// Parses a persisted settings blob. A field that is missing, has the wrong
/// shape, or has nothing enabled falls back to all-enabled; the other field
/// is kept.
pub fn validate_settings(json: &str) -> Validated<SettingsRecord> {
    let mut out = Validated::new(SettingsRecord::default());
    let parsed = serde_json::from_str::<Value>(json).ok();

    for (key, len) in [("frets", FRET_COUNT), ("strings", STRING_COUNT)] {
        let mask = parsed
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| read_mask(v, len));
        match mask {
            Some(mask) if key == "frets" => out.record.frets = mask,
            Some(mask) => out.record.strings = mask,
            None => out.defaulted.push(key.to_string()),
        }
    }

    out
}

fn read_mask(value: &Value, len: usize) -> Option<Vec<bool>> {
    let items = value.as_array()?;
    if items.len() != len {
        return None;
    }
    let mask = items.iter().map(Value::as_bool).collect::<Option<Vec<bool>>>()?;
    mask.iter().any(|&on| on).then_some(mask)
}
