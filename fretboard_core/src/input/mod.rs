pub mod events;

use std::time::Duration;

use self::events::QuizInput;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

/// Player inputs flowing from a reader thread to the quiz loop.
pub struct InputQueue {
    sender: Sender<QuizInput>,
    receiver: Receiver<QuizInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Producer handle for whatever reads the player's keystrokes.
    pub fn sender(&self) -> Sender<QuizInput> {
        self.sender.clone()
    }

    /// Next input, or `None` once `timeout` passes. The loop sizes `timeout`
    /// to the pending auto-advance deadline.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<QuizInput> {
        match self.receiver.recv_timeout(timeout) {
            Ok(input) => Some(input),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Blocks while no round timer is pending.
    pub fn wait(&self) -> Option<QuizInput> {
        self.receiver.recv().ok()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
