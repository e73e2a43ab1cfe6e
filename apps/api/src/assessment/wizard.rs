//! Wizard Controller — the position state machine over steps 1..=10.
//!
//! Advancement is deliberately not gated on completion here: the client
//! disables the control, but the controller honours any call it gets.
//! Free navigation to any step (including incomplete ones) is a product
//! decision carried over as-is. Every position change is persisted
//! synchronously, unlike the debounced record writes.

use std::sync::Arc;

use tracing::warn;

use crate::assessment::completion::STEP_COUNT;
use crate::storage::{KvStore, STEP_KEY};

pub const FIRST_STEP: u8 = 1;

/// Outcome of an advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to the contained step.
    Moved(u8),
    /// Already at the final step — hand off to report generation.
    Complete,
}

pub struct Wizard {
    store: Arc<dyn KvStore>,
    position: u8,
}

impl Wizard {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            position: FIRST_STEP,
        }
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Restores the persisted position. Absent, malformed, or
    /// out-of-range values fall back to step 1 with a log line.
    pub fn load_from_store(&mut self) {
        let text = match self.store.read(STEP_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read saved wizard position: {e:#}");
                return;
            }
        };

        match text.trim().parse::<u8>() {
            Ok(step) if (FIRST_STEP..=STEP_COUNT).contains(&step) => self.position = step,
            Ok(step) => warn!("Saved wizard position {step} out of range, starting at 1"),
            Err(e) => warn!("Saved wizard position is malformed, starting at 1: {e}"),
        }
    }

    pub fn advance(&mut self) -> Advance {
        if self.position < STEP_COUNT {
            self.set_position(self.position + 1);
            Advance::Moved(self.position)
        } else {
            Advance::Complete
        }
    }

    /// No-op at step 1.
    pub fn retreat(&mut self) -> u8 {
        if self.position > FIRST_STEP {
            self.set_position(self.position - 1);
        }
        self.position
    }

    /// Unconditional jump; the HTTP layer validates the range.
    pub fn jump_to(&mut self, step: u8) {
        debug_assert!((FIRST_STEP..=STEP_COUNT).contains(&step));
        self.set_position(step);
    }

    /// Back to step 1, used when a new assessment starts. Drops the
    /// persisted position rather than writing "1".
    pub fn reset(&mut self) {
        self.position = FIRST_STEP;
        if let Err(e) = self.store.remove(STEP_KEY) {
            warn!("Failed to remove saved wizard position: {e:#}");
        }
    }

    fn set_position(&mut self, step: u8) {
        self.position = step;
        if let Err(e) = self.store.write(STEP_KEY, &step.to_string()) {
            warn!("Failed to persist wizard position {step}: {e:#}");
        }
    }
}
