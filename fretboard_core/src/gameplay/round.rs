use crossbeam_channel::{unbounded, Receiver, Sender};
use fretboard_data::{accuracy_percent, Dimension, Note, Position, SettingsRecord, StatsRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::pitch;
use crate::storage::{Storage, StatsStore};
use crate::time::scheduler::DelayedTask;
use crate::time::Millis;

/// Delay between a correct answer and the automatic next round.
pub const AUTO_ADVANCE_DELAY_MS: Millis = 800;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("no {dimension} enabled; enable at least one before starting a round")]
    InvalidConfiguration { dimension: Dimension },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingGuess,
    Answered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub position: Position,
    pub correct_answer: Note,
    pub answered: bool,
}

impl RoundState {
    pub fn phase(&self) -> RoundPhase {
        if self.answered {
            RoundPhase::Answered
        } else {
            RoundPhase::AwaitingGuess
        }
    }
}

/// Counters for the running process only; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub correct: u32,
    pub total: u32,
}

impl SessionCounters {
    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.correct, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    Judged { is_correct: bool, correct_answer: Note },
    /// No round is awaiting a guess; nothing was recorded.
    AlreadyAnswered,
}

/// Round transitions, pushed to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Started {
        position: Position,
        correct_answer: Note,
    },
    Answered {
        position: Position,
        is_correct: bool,
        correct_answer: Note,
    },
}

/// The quiz state machine.
///
/// `new_round` always lands in `AwaitingGuess`. The first `guess` moves the
/// round to `Answered`, records the attempt and, when correct, schedules the
/// next round `AUTO_ADVANCE_DELAY_MS` later. Later guesses are ignored until a
/// new round starts. Starting a round by any path cancels a pending
/// auto-advance.
///
/// Time is never read here: `guess` and `poll` take the caller's `now`. The
/// pending auto-advance holds only its deadline; `poll` draws against the
/// settings the caller passes at fire time.
pub struct RoundController<S, R> {
    stats_store: StatsStore<S>,
    stats: StatsRecord,
    session: SessionCounters,
    rng: R,
    round: Option<RoundState>,
    auto_advance: DelayedTask<()>,
    subscribers: Vec<Sender<RoundEvent>>,
}

impl<S: Storage, R: Rng> RoundController<S, R> {
    pub fn new(stats_store: StatsStore<S>, rng: R) -> Self {
        let stats = stats_store.load();
        Self {
            stats_store,
            stats,
            session: SessionCounters::default(),
            rng,
            round: None,
            auto_advance: DelayedTask::new(),
            subscribers: Vec::new(),
        }
    }

    /// Draws a fresh position from the eligible strings and frets.
    pub fn new_round(&mut self, settings: &SettingsRecord) -> Result<RoundState, RoundError> {
        self.auto_advance.cancel();

        let strings = settings.eligible(Dimension::Strings);
        let frets = settings.eligible(Dimension::Frets);
        let string_index = *strings.choose(&mut self.rng).ok_or(RoundError::InvalidConfiguration {
            dimension: Dimension::Strings,
        })?;
        let fret = *frets.choose(&mut self.rng).ok_or(RoundError::InvalidConfiguration {
            dimension: Dimension::Frets,
        })?;

        let position = Position::new(string_index, fret);
        let round = RoundState {
            position,
            correct_answer: pitch::note_at(position),
            answered: false,
        };
        self.round = Some(round);

        debug!(string = string_index, fret, answer = %round.correct_answer, "round started");
        self.emit(RoundEvent::Started {
            position,
            correct_answer: round.correct_answer,
        });
        Ok(round)
    }

    /// Explicit "next" from the player. Same as `new_round`.
    pub fn advance(&mut self, settings: &SettingsRecord) -> Result<RoundState, RoundError> {
        self.new_round(settings)
    }

    pub fn guess(&mut self, note: Note, now: Millis) -> GuessResult {
        let Some(round) = self.round.as_mut().filter(|r| !r.answered) else {
            return GuessResult::AlreadyAnswered;
        };
        round.answered = true;
        let round = *round;

        let is_correct = note == round.correct_answer;
        self.session.total += 1;
        if is_correct {
            self.session.correct += 1;
        }

        self.stats
            .record_attempt(round.correct_answer, round.position.fret, is_correct);
        self.stats_store.save(&self.stats);

        if is_correct {
            self.auto_advance.schedule(now, AUTO_ADVANCE_DELAY_MS, ());
        }

        debug!(guess = %note, answer = %round.correct_answer, is_correct, "guess judged");
        self.emit(RoundEvent::Answered {
            position: round.position,
            is_correct,
            correct_answer: round.correct_answer,
        });

        GuessResult::Judged {
            is_correct,
            correct_answer: round.correct_answer,
        }
    }

    /// Fires the pending auto-advance once `now` reaches its deadline,
    /// drawing from the current `settings`.
    pub fn poll(
        &mut self,
        now: Millis,
        settings: &SettingsRecord,
    ) -> Result<Option<RoundState>, RoundError> {
        match self.auto_advance.take_due(now) {
            Some(()) => self.new_round(settings).map(Some),
            None => Ok(None),
        }
    }

    /// When the pending auto-advance is due, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.auto_advance.deadline()
    }

    pub fn session_accuracy(&self) -> u32 {
        self.session.accuracy()
    }

    pub fn session(&self) -> SessionCounters {
        self.session
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn stats(&self) -> &StatsRecord {
        &self.stats
    }

    /// Clears persisted stats. Session counters and settings are untouched.
    pub fn reset_stats(&mut self) {
        self.stats = self.stats_store.reset();
    }

    pub fn subscribe(&mut self) -> Receiver<RoundEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: RoundEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
