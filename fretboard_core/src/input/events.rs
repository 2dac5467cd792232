use fretboard_data::Note;

/// Something the player did, as seen by the quiz loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    Guess(Note),
    /// Move on to the next round now.
    Advance,
    Quit,
}
