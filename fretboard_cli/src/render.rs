use std::fmt::Write;

use fretboard_data::{string_name, Dimension, Position, SettingsRecord, StatsSummary, FRET_COUNT, STRING_COUNT};

/// ASCII fretboard, high E on top as in tablature, with `marked` shown as `*`.
pub fn board(marked: Option<Position>) -> String {
    let mut out = String::new();

    let mut header = format!("{:>7}", "0 ");
    for fret in 1..FRET_COUNT {
        let _ = write!(header, "|{fret:^3}");
    }
    let _ = writeln!(out, "{header}|");

    for string_index in (0..STRING_COUNT as u8).rev() {
        let name = string_name(string_index).unwrap_or("?");
        let is_marked = |fret: u8| marked == Some(Position::new(string_index, fret));

        let open = if is_marked(0) { "*" } else { " " };
        let mut line = format!("{name:>6}{open}");
        for fret in 1..FRET_COUNT as u8 {
            line.push_str(if is_marked(fret) { "|-*-" } else { "|---" });
        }
        let _ = writeln!(out, "{line}|");
    }
    out
}

pub fn stats_table(summary: &StatsSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Overall: {}/{} ({}%)",
        summary.total_correct, summary.total_attempts, summary.accuracy
    );

    let _ = writeln!(out, "\nNote    correct  total  accuracy");
    for row in &summary.notes {
        let _ = writeln!(
            out,
            "{:<7} {:>7}  {:>5}  {:>7}%",
            row.note.label(),
            row.correct,
            row.total,
            row.accuracy
        );
    }

    let _ = writeln!(out, "\nFret    correct  total  accuracy");
    for row in &summary.frets {
        let _ = writeln!(
            out,
            "{:<7} {:>7}  {:>5}  {:>7}%",
            row.fret, row.correct, row.total, row.accuracy
        );
    }

    if !summary.weakest_notes.is_empty() {
        let names: Vec<&str> = summary.weakest_notes.iter().map(|n| n.label()).collect();
        let _ = writeln!(out, "\nPractice next: {}", names.join(", "));
    }
    out
}

pub fn settings(record: &SettingsRecord) -> String {
    let mark = |on: bool| if on { 'x' } else { ' ' };
    let mut out = String::new();

    let frets: Vec<String> = record
        .mask(Dimension::Frets)
        .iter()
        .enumerate()
        .map(|(i, &on)| format!("{i}[{}]", mark(on)))
        .collect();
    let _ = writeln!(out, "frets:   {}", frets.join(" "));

    let strings: Vec<String> = record
        .mask(Dimension::Strings)
        .iter()
        .enumerate()
        .map(|(i, &on)| format!("{i}:{}[{}]", string_name(i as u8).unwrap_or("?"), mark(on)))
        .collect();
    let _ = writeln!(out, "strings: {}", strings.join(" "));
    out
}
