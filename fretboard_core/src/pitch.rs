use fretboard_data::{Note, PitchClass, Position};

/// Open-string pitch classes for standard tuning, indexed low E (0) to high E (5).
pub const OPEN_STRINGS: [PitchClass; 6] = [
    PitchClass::E,
    PitchClass::A,
    PitchClass::D,
    PitchClass::G,
    PitchClass::B,
    PitchClass::E,
];

pub fn pitch_class_at(string_index: u8, fret: u8) -> PitchClass {
    let open = OPEN_STRINGS[string_index as usize % OPEN_STRINGS.len()];
    PitchClass::new(open.semitone() as u32 + fret as u32)
}

pub fn display_name(pitch_class: PitchClass) -> Note {
    Note::from_pitch_class(pitch_class)
}

/// The note a player should name for `position`.
pub fn note_at(position: Position) -> Note {
    display_name(pitch_class_at(position.string_index, position.fret))
}
