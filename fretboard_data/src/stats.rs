use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Note, FRET_COUNT};
use crate::{accuracy_percent, Validated};

/// Running correct/total counter. `correct <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    pub fn record(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.correct, self.total)
    }
}

/// Persisted aggregate counters keyed by note and by fret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub total_correct: u32,
    pub total_attempts: u32,
    pub note_stats: BTreeMap<Note, Tally>,
    pub fret_stats: BTreeMap<u8, Tally>,
}

impl Default for StatsRecord {
    /// Every note and every fret seeded at {0, 0}.
    fn default() -> Self {
        Self {
            total_correct: 0,
            total_attempts: 0,
            note_stats: seeded_note_stats(),
            fret_stats: seeded_fret_stats(),
        }
    }
}

fn seeded_note_stats() -> BTreeMap<Note, Tally> {
    Note::ALL.into_iter().map(|n| (n, Tally::default())).collect()
}

fn seeded_fret_stats() -> BTreeMap<u8, Tally> {
    (0..FRET_COUNT as u8).map(|f| (f, Tally::default())).collect()
}

impl StatsRecord {
    /// Counts one attempt against the overall, per-note and per-fret tallies.
    /// Missing note/fret entries are created on demand. Counters saturate at
    /// `u32::MAX` instead of wrapping.
    pub fn record_attempt(&mut self, note: Note, fret: u8, correct: bool) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if correct {
            self.total_correct = self.total_correct.saturating_add(1);
        }
        self.note_stats.entry(note).or_default().record(correct);
        self.fret_stats.entry(fret).or_default().record(correct);
    }

    pub fn overall_accuracy(&self) -> u32 {
        accuracy_percent(self.total_correct, self.total_attempts)
    }

    pub fn note_accuracy(&self, note: Note) -> u32 {
        self.note_stats.get(&note).map(Tally::accuracy).unwrap_or(0)
    }

    pub fn fret_accuracy(&self, fret: u8) -> u32 {
        self.fret_stats.get(&fret).map(Tally::accuracy).unwrap_or(0)
    }

    pub fn summary(&self) -> StatsSummary {
        let notes: Vec<NoteRow> = self
            .note_stats
            .iter()
            .map(|(&note, tally)| NoteRow {
                note,
                correct: tally.correct,
                total: tally.total,
                accuracy: tally.accuracy(),
            })
            .collect();

        let frets = self
            .fret_stats
            .iter()
            .map(|(&fret, tally)| FretRow {
                fret,
                correct: tally.correct,
                total: tally.total,
                accuracy: tally.accuracy(),
            })
            .collect();

        let mut attempted: Vec<&NoteRow> = notes.iter().filter(|r| r.total > 0).collect();
        attempted.sort_by(|a, b| a.accuracy.cmp(&b.accuracy).then(b.total.cmp(&a.total)));
        let weakest_notes = attempted
            .into_iter()
            .take(WEAKEST_NOTE_COUNT)
            .map(|r| r.note)
            .collect();

        StatsSummary {
            total_correct: self.total_correct,
            total_attempts: self.total_attempts,
            accuracy: self.overall_accuracy(),
            notes,
            frets,
            weakest_notes,
        }
    }
}

const WEAKEST_NOTE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRow {
    pub note: Note,
    pub correct: u32,
    pub total: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FretRow {
    pub fret: u8,
    pub correct: u32,
    pub total: u32,
    pub accuracy: u32,
}

/// Read-only view of a `StatsRecord` for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_correct: u32,
    pub total_attempts: u32,
    pub accuracy: u32,
    pub notes: Vec<NoteRow>,
    pub frets: Vec<FretRow>,
    /// Attempted notes with the lowest accuracy, ties broken by more attempts first.
    pub weakest_notes: Vec<Note>,
}

/// Parses a persisted stats blob, falling back to defaults field by field.
pub fn validate_stats(json: &str) -> Validated<StatsRecord> {
    let mut out = Validated::new(StatsRecord::default());

    let obj = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(obj)) => obj,
        _ => {
            out.defaulted.extend(
                ["totalCorrect", "totalAttempts", "noteStats", "fretStats"].map(String::from),
            );
            return out;
        }
    };

    match read_counter(&obj, "totalCorrect") {
        Some(c) => out.record.total_correct = c,
        None => out.defaulted.push("totalCorrect".into()),
    }
    match read_counter(&obj, "totalAttempts") {
        Some(t) => out.record.total_attempts = t,
        None => out.defaulted.push("totalAttempts".into()),
    }
    match obj.get("noteStats") {
        Some(Value::Object(map)) => {
            for (key, value) in map {
                let Some(note) = Note::from_label(key) else {
                    continue;
                };
                match read_tally(value) {
                    Some(tally) => {
                        out.record.note_stats.insert(note, tally);
                    }
                    None => out.defaulted.push(format!("noteStats.{key}")),
                }
            }
        }
        _ => out.defaulted.push("noteStats".into()),
    }

    match obj.get("fretStats") {
        Some(Value::Object(map)) => {
            for (key, value) in map {
                let Some(fret) = key.parse::<u8>().ok().filter(|f| (*f as usize) < FRET_COUNT)
                else {
                    continue;
                };
                match read_tally(value) {
                    Some(tally) => {
                        out.record.fret_stats.insert(fret, tally);
                    }
                    None => out.defaulted.push(format!("fretStats.{key}")),
                }
            }
        }
        _ => out.defaulted.push("fretStats".into()),
    }

    // Every attempt lands on exactly one fret, so the totals follow the fret tallies.
    let (fret_correct, fret_total) = out
        .record
        .fret_stats
        .values()
        .fold((0u32, 0u32), |(c, t), tally| {
            (c.saturating_add(tally.correct), t.saturating_add(tally.total))
        });
    if out.record.total_correct != fret_correct || out.record.total_attempts != fret_total {
        out.record.total_correct = fret_correct;
        out.record.total_attempts = fret_total;
        out.defaulted.retain(|f| f != "totalCorrect" && f != "totalAttempts");
        out.defaulted.push("totalCorrect".into());
        out.defaulted.push("totalAttempts".into());
    }

    out
}

fn read_counter(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn read_tally(value: &Value) -> Option<Tally> {
    let obj = value.as_object()?;
    let correct = read_counter(obj, "correct")?;
    let total = read_counter(obj, "total")?;
    (correct <= total).then_some(Tally { correct, total })
}
