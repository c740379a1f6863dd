//! The sequence scheduler.
//!
//! Single-threaded and cooperative: the host calls `tick(dt)` once per
//! frame and every running sequence advances by that much simulated time,
//! in the order the sequences were started. Any number of main-track
//! sequences may run side by side; at most one override (cutscene)
//! sequence runs at a time.

use std::fmt;

use daybreak_core::assets::Overlay;
use daybreak_core::error::DomainError;
use daybreak_core::ports::Stage;
use serde::Serialize;
use tracing::{debug, info};

use super::running::{Progress, RunningSequence};
use crate::domain::fade::OverlayLevels;
use crate::domain::steps::Sequence;

/// Identity of a started sequence, used to cancel it or match its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SequenceHandle(u64);

impl SequenceHandle {
    /// Returns the numeric id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq#{}", self.0)
    }
}

/// Which track a sequence runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Ordinary gameplay sequences.
    Main,
    /// The single cutscene slot. Always holds the control lock.
    Override,
}

/// Why a sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Every step ran.
    Completed,
    /// `cancel` was called. Side effects already dispatched stay in place.
    Cancelled,
}

/// Report for a sequence that stopped running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedSequence {
    /// The sequence's handle.
    pub handle: SequenceHandle,
    /// The sequence's name.
    pub name: String,
    /// Track it ran on.
    pub track: Track,
    /// Why it stopped.
    pub reason: FinishReason,
}

impl FinishedSequence {
    /// Whether the sequence ran to its end.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.reason == FinishReason::Completed
    }
}

/// Runs sequences against a `Stage`.
#[derive(Debug, Default)]
pub struct SequenceScheduler {
    next_handle: u64,
    running: Vec<RunningSequence>,
    finished: Vec<FinishedSequence>,
    overlays: OverlayLevels,
}

impl SequenceScheduler {
    /// Creates an idle scheduler with transparent overlays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `sequence` on the main track.
    ///
    /// Leading instantaneous steps are dispatched immediately and the first
    /// timed step is entered, the way a coroutine runs up to its first
    /// suspension when started.
    pub fn run_sequentially(&mut self, sequence: Sequence, stage: &mut Stage) -> SequenceHandle {
        self.start(sequence, Track::Main, stage)
    }

    /// Starts `sequence` on the override track.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OverrideTrackBusy` if an override is already running.
    pub fn run_override(
        &mut self,
        sequence: Sequence,
        stage: &mut Stage,
    ) -> Result<SequenceHandle, DomainError> {
        if self.is_override_active() {
            return Err(DomainError::OverrideTrackBusy);
        }
        Ok(self.start(sequence, Track::Override, stage))
    }

    /// Stops a running sequence. Its control-lock token is released now and
    /// the cancellation is reported by the next `tick`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownSequence` if `handle` is not running.
    pub fn cancel(&mut self, handle: SequenceHandle, stage: &mut Stage) -> Result<(), DomainError> {
        let Some(index) = self.running.iter().position(|r| r.handle == handle) else {
            debug!(%handle, "cancel ignored: sequence not running");
            return Err(DomainError::UnknownSequence(handle.id()));
        };
        let running = self.running.remove(index);
        info!(%handle, name = running.name(), "sequence cancelled");
        self.retire(running, FinishReason::Cancelled, stage);
        Ok(())
    }

    /// Cancels every running sequence. Returns how many were stopped.
    pub fn cancel_all(&mut self, stage: &mut Stage) -> usize {
        let running = std::mem::take(&mut self.running);
        let count = running.len();
        for sequence in running {
            self.retire(sequence, FinishReason::Cancelled, stage);
        }
        count
    }

    /// Advances every running sequence by `dt` seconds and returns the
    /// sequences that stopped since the previous tick, in stop order.
    pub fn tick(&mut self, dt: f32, stage: &mut Stage) -> Vec<FinishedSequence> {
        let mut index = 0;
        while index < self.running.len() {
            match self.running[index].advance(dt, stage, &mut self.overlays) {
                Progress::Suspended => index += 1,
                Progress::Finished => {
                    let done = self.running.remove(index);
                    self.retire(done, FinishReason::Completed, stage);
                }
            }
        }
        std::mem::take(&mut self.finished)
    }

    /// Whether `handle` is still running.
    #[must_use]
    pub fn is_running(&self, handle: SequenceHandle) -> bool {
        self.running.iter().any(|r| r.handle == handle)
    }

    /// Whether a cutscene occupies the override track.
    #[must_use]
    pub fn is_override_active(&self) -> bool {
        self.running.iter().any(|r| r.track == Track::Override)
    }

    /// Number of running sequences on both tracks.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Current opacity of `overlay`.
    #[must_use]
    pub fn overlay_alpha(&self, overlay: Overlay) -> f32 {
        self.overlays.get(overlay)
    }

    /// Sets an overlay's opacity outside of any sequence.
    pub fn set_overlay_alpha(&mut self, overlay: Overlay, alpha: f32, stage: &mut Stage) {
        let alpha = self.overlays.set(overlay, alpha);
        stage.overlay.set_overlay_alpha(overlay, alpha);
    }

    fn start(&mut self, sequence: Sequence, track: Track, stage: &mut Stage) -> SequenceHandle {
        self.next_handle += 1;
        let handle = SequenceHandle(self.next_handle);
        let token =
            (sequence.locks_movement || track == Track::Override).then(|| stage.lock.acquire());
        info!(%handle, name = %sequence.name, ?track, steps = sequence.steps.len(), "sequence started");

        let mut running = RunningSequence::new(handle, track, sequence, token);
        match running.advance(0.0, stage, &mut self.overlays) {
            Progress::Suspended => self.running.push(running),
            Progress::Finished => self.retire(running, FinishReason::Completed, stage),
        }
        handle
    }

    fn retire(&mut self, running: RunningSequence, reason: FinishReason, stage: &mut Stage) {
        if let Some(token) = running.token {
            stage.lock.release(token);
        }
        if reason == FinishReason::Completed {
            debug!(handle = %running.handle, name = running.name(), "sequence completed");
        }
        self.finished.push(FinishedSequence {
            handle: running.handle,
            name: running.name().to_owned(),
            track: running.track,
            reason,
        });
    }
}
