//! Reference-counted gate deciding whether the player may move.
//!
//! Every sequence that suppresses movement holds its own token. Movement is
//! enabled exactly when no token is outstanding, so overlapping holders can
//! release in any order without re-enabling movement early.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::error::DomainError;
use crate::ports::MovementController;

/// Opaque handle for one outstanding movement suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlLockToken(u64);

impl ControlLockToken {
    /// Returns the numeric id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControlLockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock#{}", self.0)
    }
}

/// The control lock. Sole owner of the movement collaborator.
pub struct ControlLock {
    movement: Box<dyn MovementController>,
    outstanding: BTreeSet<u64>,
    next_token: u64,
}

impl ControlLock {
    /// Creates an unlocked control lock driving `movement`.
    #[must_use]
    pub fn new(movement: Box<dyn MovementController>) -> Self {
        Self {
            movement,
            outstanding: BTreeSet::new(),
            next_token: 1,
        }
    }

    /// Suppresses movement until the returned token is released.
    ///
    /// The movement collaborator is only notified on the 0 → 1 transition.
    pub fn acquire(&mut self) -> ControlLockToken {
        let id = self.next_token;
        self.next_token += 1;
        let was_free = self.outstanding.is_empty();
        self.outstanding.insert(id);
        debug!(token = id, outstanding = self.outstanding.len(), "control lock acquired");
        if was_free {
            self.movement.set_movement_enabled(false);
        }
        ControlLockToken(id)
    }

    /// Releases a token. Returns `false` (and logs) if it was not outstanding.
    ///
    /// The movement collaborator is only notified on the 1 → 0 transition.
    pub fn release(&mut self, token: ControlLockToken) -> bool {
        if !self.outstanding.remove(&token.0) {
            warn!(error = %DomainError::DoubleRelease(token.0), "ignoring release");
            return false;
        }
        debug!(token = token.0, outstanding = self.outstanding.len(), "control lock released");
        if self.outstanding.is_empty() {
            self.movement.set_movement_enabled(true);
        }
        true
    }

    /// Forcibly releases every outstanding token (scene exit).
    ///
    /// Returns how many tokens were dropped.
    pub fn release_all(&mut self) -> usize {
        let dropped = self.outstanding.len();
        if dropped > 0 {
            warn!(dropped, "force-releasing outstanding control lock tokens");
            self.outstanding.clear();
            self.movement.set_movement_enabled(true);
        }
        dropped
    }

    /// Number of tokens currently held.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether the player is currently allowed to move.
    #[must_use]
    pub fn is_movement_enabled(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Whether `token` is still outstanding.
    #[must_use]
    pub fn is_held(&self, token: ControlLockToken) -> bool {
        self.outstanding.contains(&token.0)
    }
}

impl fmt::Debug for ControlLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlLock")
            .field("outstanding", &self.outstanding)
            .field("next_token", &self.next_token)
            .finish_non_exhaustive()
    }
}

impl Drop for ControlLock {
    fn drop(&mut self) {
        self.release_all();
    }
}
