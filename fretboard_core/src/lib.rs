//! Quiz core for the fretboard note trainer: pitch lookup, persisted
//! stats/settings stores and the round state machine. Contains no
//! presentation code; adapters drive it through `RoundController`
//! and the stores.

pub mod gameplay;
pub mod input;
pub mod pitch;
pub mod storage;
pub mod time;

pub use fretboard_data as data;
