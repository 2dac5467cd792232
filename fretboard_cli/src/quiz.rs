use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Sender;
use fretboard_core::gameplay::{GuessResult, RoundController, RoundEvent, RoundPhase};
use fretboard_core::input::events::QuizInput;
use fretboard_core::input::InputQueue;
use fretboard_core::storage::{SettingsStore, StatsStore};
use fretboard_core::time::clock::{Clock, SystemClock};
use fretboard_data::Note;

use crate::config::Config;
use crate::render;

pub fn run(config: &Config, rounds: Option<u32>) -> anyhow::Result<()> {
    let storage = Rc::new(config.storage());
    let settings = SettingsStore::new(Rc::clone(&storage)).load();
    let mut controller = RoundController::new(StatsStore::new(Rc::clone(&storage)), config.rng());
    let events = controller.subscribe();
    let clock = SystemClock::new();

    let queue = InputQueue::new();
    spawn_stdin_reader(queue.sender());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Name the note (e.g. C, F#, Bb). Enter skips or continues, q quits."
    )?;

    controller
        .new_round(&settings)
        .context("cannot start a round; re-enable at least one fret and string")?;

    let mut answered = 0u32;
    'quiz: loop {
        for event in events.try_iter() {
            match event {
                RoundEvent::Started { position, .. } => {
                    write!(out, "\n{}\n{position}? ", render::board(Some(position)))?;
                }
                RoundEvent::Answered {
                    is_correct,
                    correct_answer,
                    ..
                } => {
                    answered += 1;
                    if is_correct {
                        writeln!(out, "Correct! {correct_answer}")?;
                    } else {
                        writeln!(out, "Wrong, it was {correct_answer}. Press enter to continue.")?;
                    }
                    let session = controller.session();
                    writeln!(
                        out,
                        "Session: {}/{} ({}%)",
                        session.correct,
                        session.total,
                        controller.session_accuracy()
                    )?;
                    if rounds.is_some_and(|limit| answered >= limit) {
                        break 'quiz;
                    }
                }
            }
        }
        out.flush()?;

        let input = match controller.next_deadline() {
            Some(due) => {
                let now = clock.now_ms();
                if due <= now {
                    controller
                        .poll(now, &settings)
                        .context("cannot start a round; re-enable at least one fret and string")?;
                    continue;
                }
                queue.pop_timeout(Duration::from_millis(due - now))
            }
            None => queue.wait(),
        };

        match input {
            None => {
                controller
                    .poll(clock.now_ms(), &settings)
                    .context("cannot start a round; re-enable at least one fret and string")?;
            }
            Some(QuizInput::Guess(note)) => {
                if controller.guess(note, clock.now_ms()) == GuessResult::AlreadyAnswered {
                    writeln!(out, "Already answered; press enter for the next position.")?;
                }
            }
            Some(QuizInput::Advance) => {
                let skipping = controller.round().map(|r| r.phase()) == Some(RoundPhase::AwaitingGuess);
                if skipping {
                    writeln!(out, "Skipped.")?;
                }
                controller
                    .advance(&settings)
                    .context("cannot start a round; re-enable at least one fret and string")?;
            }
            Some(QuizInput::Quit) => break,
        }
    }

    let session = controller.session();
    writeln!(
        out,
        "\nDone: {}/{} correct ({}%).",
        session.correct,
        session.total,
        controller.session_accuracy()
    )?;
    Ok(())
}

/// Reads lines from stdin and turns them into quiz inputs. EOF quits.
fn spawn_stdin_reader(sender: Sender<QuizInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let input = match line.trim() {
                "" => QuizInput::Advance,
                "q" | "quit" | "exit" => QuizInput::Quit,
                text => match text.parse::<Note>() {
                    Ok(note) => QuizInput::Guess(note),
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                },
            };
            if sender.send(input).is_err() {
                return;
            }
        }
        let _ = sender.send(QuizInput::Quit);
    });
}
