use super::Millis;

/// A single cancellable delayed task carrying its payload.
///
/// Scheduling replaces any pending task, so at most one is ever live.
#[derive(Debug, Clone)]
pub struct DelayedTask<T> {
    pending: Option<(Millis, T)>,
}

impl<T> Default for DelayedTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DelayedTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Millis, delay: Millis, payload: T) {
        self.pending = Some((now.saturating_add(delay), payload));
    }

    /// Drops the pending task, returning whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Removes and returns the payload once `now` has reached the deadline.
    pub fn take_due(&mut self, now: Millis) -> Option<T> {
        match self.pending {
            Some((due, _)) if now >= due => self.pending.take().map(|(_, payload)| payload),
            _ => None,
        }
    }
}
