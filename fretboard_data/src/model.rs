use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of strings on the board. Index 0 is the low E string.
pub const STRING_COUNT: usize = 6;

/// Number of selectable frets, open string (0) through the 12th fret.
pub const FRET_COUNT: usize = 13;

const STRING_NAMES: [&str; STRING_COUNT] = ["low E", "A", "D", "G", "B", "high E"];

/// Human-readable name of a string index, `None` when out of range.
pub fn string_name(string_index: u8) -> Option<&'static str> {
    STRING_NAMES.get(string_index as usize).copied()
}

/// A semitone identity ignoring octave, 0 = C through 11 = B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const D: PitchClass = PitchClass(2);
    pub const E: PitchClass = PitchClass(4);
    pub const F: PitchClass = PitchClass(5);
    pub const G: PitchClass = PitchClass(7);
    pub const A: PitchClass = PitchClass(9);
    pub const B: PitchClass = PitchClass(11);

    /// Wraps any semitone count into the 0..12 range.
    pub fn new(semitones: u32) -> Self {
        Self((semitones % 12) as u8)
    }

    pub fn semitone(self) -> u8 {
        self.0
    }
}

/// The user-facing label of a pitch class. Serialized as its canonical label,
/// which is also the key of the per-note stats map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Note {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#/Db")]
    CSharp,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#/Eb")]
    DSharp,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#/Gb")]
    FSharp,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#/Ab")]
    GSharp,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#/Bb")]
    ASharp,
    #[serde(rename = "B")]
    B,
}

impl Note {
    /// All notes in ascending semitone order starting at C.
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    pub fn from_pitch_class(pitch_class: PitchClass) -> Self {
        Self::ALL[pitch_class.semitone() as usize]
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass(self as u8)
    }

    pub fn label(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#/Db",
            Note::D => "D",
            Note::DSharp => "D#/Eb",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#/Gb",
            Note::G => "G",
            Note::GSharp => "G#/Ab",
            Note::A => "A",
            Note::ASharp => "A#/Bb",
            Note::B => "B",
        }
    }

    /// Exact lookup by canonical label only.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.label() == label)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown note name: {0:?}")]
pub struct ParseNoteError(pub String);

impl FromStr for Note {
    type Err = ParseNoteError;

    /// Accepts the canonical label or either enharmonic spelling,
    /// case-insensitively ("c#", "Db", "D♭", "c#/db").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(note) = Self::from_label(trimmed) {
            return Ok(note);
        }

        let normalized = trimmed.replace('♯', "#").replace('♭', "b");
        let mut chars = normalized.chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| ParseNoteError(s.to_string()))?;
        let accidental: String = chars.collect::<String>().to_ascii_lowercase();

        let natural: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(ParseNoteError(s.to_string())),
        };

        let offset = match accidental.as_str() {
            "" => 0,
            "#" => 1,
            "b" => -1,
            // Full canonical label in a different case, e.g. "c#/db".
            other => {
                let upper = format!("{letter}{other}");
                return Self::ALL
                    .into_iter()
                    .find(|n| n.label().eq_ignore_ascii_case(&upper))
                    .ok_or_else(|| ParseNoteError(s.to_string()));
            }
        };

        Ok(Note::from_pitch_class(PitchClass::new(
            (natural + offset).rem_euclid(12) as u32,
        )))
    }
}

/// A (string, fret) pair on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub string_index: u8,
    pub fret: u8,
}

impl Position {
    pub fn new(string_index: u8, fret: u8) -> Self {
        Self { string_index, fret }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = string_name(self.string_index).unwrap_or("?");
        if self.fret == 0 {
            write!(f, "{name} string, open")
        } else {
            write!(f, "{name} string, fret {}", self.fret)
        }
    }
}
