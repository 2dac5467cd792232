use std::collections::HashSet;

use fretboard_core::data::{Dimension, Note, Position, SettingsRecord, FRET_COUNT, STRING_COUNT};
use fretboard_core::gameplay::{
    GuessResult, RoundController, RoundError, RoundEvent, RoundPhase, AUTO_ADVANCE_DELAY_MS,
};
use fretboard_core::pitch;
use fretboard_core::storage::{MemoryStorage, StatsStore};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn zero_rng() -> StepRng {
    StepRng::new(0, 0)
}

fn wrong_note(answer: Note) -> Note {
    if answer == Note::C {
        Note::D
    } else {
        Note::C
    }
}

#[test]
fn test_zero_draw_picks_open_low_string() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());

    let round = controller.new_round(&SettingsRecord::default()).unwrap();
    assert_eq!(round.position, Position::new(0, 0));
    assert_eq!(
        round.correct_answer,
        pitch::display_name(pitch::OPEN_STRINGS[0])
    );
    assert_eq!(round.correct_answer, Note::E);
    assert_eq!(round.phase(), RoundPhase::AwaitingGuess);
}

#[test]
fn test_only_open_fret_enabled_always_draws_fret_zero() {
    let storage = MemoryStorage::new();
    let mut controller =
        RoundController::new(StatsStore::new(&storage), Pcg32::seed_from_u64(7));
    let mut settings = SettingsRecord::default();
    settings.select_none(Dimension::Frets);

    let mut strings_seen = HashSet::new();
    for _ in 0..200 {
        let round = controller.new_round(&settings).unwrap();
        assert_eq!(round.position.fret, 0);
        strings_seen.insert(round.position.string_index);
    }
    assert_eq!(strings_seen.len(), STRING_COUNT);
}

#[test]
fn test_draws_stay_inside_eligible_sets() {
    let storage = MemoryStorage::new();
    let mut controller =
        RoundController::new(StatsStore::new(&storage), Pcg32::seed_from_u64(42));
    let settings = SettingsRecord {
        frets: (0..FRET_COUNT).map(|f| f == 3 || f == 7).collect(),
        strings: (0..STRING_COUNT).map(|s| s == 2 || s == 4).collect(),
    };

    let mut seen = HashSet::new();
    for _ in 0..200 {
        let round = controller.new_round(&settings).unwrap();
        assert!([3, 7].contains(&round.position.fret));
        assert!([2, 4].contains(&round.position.string_index));
        assert_eq!(round.correct_answer, pitch::note_at(round.position));
        seen.insert(round.position);
    }
    // Independent draws cover the whole cross product.
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_second_guess_is_ignored() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let round = controller.new_round(&SettingsRecord::default()).unwrap();

    let first = controller.guess(round.correct_answer, 0);
    assert_eq!(
        first,
        GuessResult::Judged {
            is_correct: true,
            correct_answer: Note::E
        }
    );

    let second = controller.guess(round.correct_answer, 10);
    assert_eq!(second, GuessResult::AlreadyAnswered);

    assert_eq!(controller.stats().total_attempts, 1);
    assert_eq!(controller.session().total, 1);
    assert_eq!(StatsStore::new(&storage).load().total_attempts, 1);
    assert_eq!(
        controller.round().map(|r| r.phase()),
        Some(RoundPhase::Answered)
    );
}

#[test]
fn test_guess_before_any_round_is_ignored() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());

    assert_eq!(controller.guess(Note::E, 0), GuessResult::AlreadyAnswered);
    assert_eq!(controller.session().total, 0);
    assert_eq!(controller.stats().total_attempts, 0);
}

#[test]
fn test_correct_guess_auto_advances_after_delay() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let settings = SettingsRecord::default();
    let round = controller.new_round(&settings).unwrap();

    controller.guess(round.correct_answer, 1_000);
    assert_eq!(
        controller.next_deadline(),
        Some(1_000 + AUTO_ADVANCE_DELAY_MS)
    );

    assert_eq!(controller.poll(1_000 + AUTO_ADVANCE_DELAY_MS - 1, &settings), Ok(None));

    let next = controller
        .poll(1_000 + AUTO_ADVANCE_DELAY_MS, &settings)
        .unwrap()
        .expect("auto-advance should fire");
    assert_eq!(next.phase(), RoundPhase::AwaitingGuess);
    assert_eq!(controller.next_deadline(), None);
    assert_eq!(controller.poll(10_000, &settings), Ok(None));
}

#[test]
fn test_wrong_guess_waits_for_manual_advance() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let settings = SettingsRecord::default();
    let round = controller.new_round(&settings).unwrap();

    let result = controller.guess(wrong_note(round.correct_answer), 0);
    assert_eq!(
        result,
        GuessResult::Judged {
            is_correct: false,
            correct_answer: round.correct_answer
        }
    );
    assert_eq!(controller.next_deadline(), None);
    assert_eq!(controller.poll(60_000, &settings), Ok(None));
    assert_eq!(
        controller.round().map(|r| r.phase()),
        Some(RoundPhase::Answered)
    );

    let next = controller.advance(&settings).unwrap();
    assert_eq!(next.phase(), RoundPhase::AwaitingGuess);
}

#[test]
fn test_manual_advance_cancels_pending_auto_advance() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let settings = SettingsRecord::default();
    let round = controller.new_round(&settings).unwrap();

    controller.guess(round.correct_answer, 0);
    assert!(controller.next_deadline().is_some());

    controller.advance(&settings).unwrap();
    assert_eq!(controller.next_deadline(), None);

    // The stale timer must not replace the round the player moved to.
    assert_eq!(controller.poll(AUTO_ADVANCE_DELAY_MS * 2, &settings), Ok(None));
    assert_eq!(
        controller.round().map(|r| r.phase()),
        Some(RoundPhase::AwaitingGuess)
    );
}

#[test]
fn test_auto_advance_uses_settings_current_at_fire_time() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());

    let mut settings = SettingsRecord::default();
    settings.select_none(Dimension::Frets);
    assert!(settings.set_fret(5, true));
    assert!(settings.set_fret(0, false));
    let round = controller.new_round(&settings).unwrap();
    assert_eq!(round.position.fret, 5);

    controller.guess(round.correct_answer, 0);

    // The player switches to fret 0 only while the delay is running.
    assert!(settings.set_fret(0, true));
    assert!(settings.set_fret(5, false));

    let next = controller
        .poll(AUTO_ADVANCE_DELAY_MS, &settings)
        .unwrap()
        .expect("auto-advance should fire");
    assert_eq!(next.position.fret, 0);
}

#[test]
fn test_empty_eligible_set_is_invalid_configuration() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let round = controller.new_round(&SettingsRecord::default()).unwrap();
    controller.guess(round.correct_answer, 0);

    let no_frets = SettingsRecord {
        frets: vec![false; FRET_COUNT],
        strings: vec![true; STRING_COUNT],
    };
    assert_eq!(
        controller.new_round(&no_frets),
        Err(RoundError::InvalidConfiguration {
            dimension: Dimension::Frets
        })
    );
    // The attempt still cancels the pending advance.
    assert_eq!(controller.next_deadline(), None);

    let no_strings = SettingsRecord {
        frets: vec![true; FRET_COUNT],
        strings: vec![false; STRING_COUNT],
    };
    assert_eq!(
        controller.new_round(&no_strings),
        Err(RoundError::InvalidConfiguration {
            dimension: Dimension::Strings
        })
    );
}

#[test]
fn test_session_accuracy_rounds() {
    let storage = MemoryStorage::new();
    let mut controller =
        RoundController::new(StatsStore::new(&storage), Pcg32::seed_from_u64(1));
    let settings = SettingsRecord::default();
    assert_eq!(controller.session_accuracy(), 0);

    for correct in [true, true, false] {
        let round = controller.new_round(&settings).unwrap();
        let note = if correct {
            round.correct_answer
        } else {
            wrong_note(round.correct_answer)
        };
        controller.guess(note, 0);
    }

    assert_eq!(controller.session().correct, 2);
    assert_eq!(controller.session().total, 3);
    assert_eq!(controller.session_accuracy(), 67);
}

#[test]
fn test_subscribers_see_every_transition() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let events = controller.subscribe();
    let settings = SettingsRecord::default();

    let round = controller.new_round(&settings).unwrap();
    controller.guess(round.correct_answer, 0);
    controller.poll(AUTO_ADVANCE_DELAY_MS, &settings).unwrap();

    let received: Vec<RoundEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            RoundEvent::Started {
                position: Position::new(0, 0),
                correct_answer: Note::E
            },
            RoundEvent::Answered {
                position: Position::new(0, 0),
                is_correct: true,
                correct_answer: Note::E
            },
            RoundEvent::Started {
                position: Position::new(0, 0),
                correct_answer: Note::E
            },
        ]
    );
}

#[test]
fn test_dropped_subscriber_is_pruned() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    drop(controller.subscribe());
    let live = controller.subscribe();

    controller.new_round(&SettingsRecord::default()).unwrap();
    assert_eq!(live.try_iter().count(), 1);
}

#[test]
fn test_stats_are_written_through_and_survive_write_failure() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let settings = SettingsRecord::default();

    let round = controller.new_round(&settings).unwrap();
    controller.guess(round.correct_answer, 0);
    let persisted = StatsStore::new(&storage).load();
    assert_eq!(persisted.note_stats[&Note::E].total, 1);
    assert_eq!(persisted.fret_stats[&0].correct, 1);

    storage.fail_writes(true);
    let round = controller.advance(&settings).unwrap();
    controller.guess(wrong_note(round.correct_answer), 0);

    // In memory the attempt counts; storage still holds the earlier write.
    assert_eq!(controller.stats().total_attempts, 2);
    assert_eq!(StatsStore::new(&storage).load().total_attempts, 1);
}

#[test]
fn test_existing_stats_are_loaded_and_extended() {
    let storage = MemoryStorage::new();
    {
        let store = StatsStore::new(&storage);
        let mut record = store.load();
        record.record_attempt(Note::E, 0, false);
        store.save(&record);
    }

    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    assert_eq!(controller.stats().total_attempts, 1);

    let round = controller.new_round(&SettingsRecord::default()).unwrap();
    controller.guess(round.correct_answer, 0);
    let persisted = StatsStore::new(&storage).load();
    assert_eq!(persisted.note_stats[&Note::E].correct, 1);
    assert_eq!(persisted.note_stats[&Note::E].total, 2);
}

#[test]
fn test_reset_stats_keeps_session_counters() {
    let storage = MemoryStorage::new();
    let mut controller = RoundController::new(StatsStore::new(&storage), zero_rng());
    let round = controller.new_round(&SettingsRecord::default()).unwrap();
    controller.guess(round.correct_answer, 0);

    controller.reset_stats();
    assert_eq!(controller.stats().total_attempts, 0);
    assert_eq!(controller.session().total, 1);
    assert_eq!(StatsStore::new(&storage).load().total_attempts, 0);
}
