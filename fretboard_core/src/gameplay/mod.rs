pub mod round;

pub use round::{
    GuessResult, RoundController, RoundError, RoundEvent, RoundPhase, RoundState,
    SessionCounters, AUTO_ADVANCE_DELAY_MS,
};
