//! Step interpreter for one running sequence.

use daybreak_core::control_lock::ControlLockToken;
use daybreak_core::ports::Stage;
use tracing::{trace, warn};

use super::scheduler::{SequenceHandle, Track};
use crate::domain::fade::{FadeRamp, OverlayLevels};
use crate::domain::steps::{Sequence, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    Suspended,
    Finished,
}

/// Progress state for a sequence the scheduler is running.
#[derive(Debug)]
pub(crate) struct RunningSequence {
    pub(crate) handle: SequenceHandle,
    pub(crate) track: Track,
    pub(crate) token: Option<ControlLockToken>,
    sequence: Sequence,
    step_index: usize,
    step_elapsed: f32,
    step_entered: bool,
    ramp: Option<FadeRamp>,
}

impl RunningSequence {
    pub(crate) fn new(
        handle: SequenceHandle,
        track: Track,
        sequence: Sequence,
        token: Option<ControlLockToken>,
    ) -> Self {
        Self {
            handle,
            track,
            token,
            sequence,
            step_index: 0,
            step_elapsed: 0.0,
            step_entered: false,
            ramp: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.sequence.name
    }

    /// Spends `dt` seconds of simulated time.
    ///
    /// Time left over when a timed step ends carries into the next step, so
    /// the outcome does not depend on how the host slices its ticks.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        stage: &mut Stage,
        overlays: &mut OverlayLevels,
    ) -> Progress {
        let mut budget = dt.max(0.0);
        loop {
            let Some(step) = self.sequence.steps.get(self.step_index) else {
                return Progress::Finished;
            };

            if !self.step_entered {
                self.step_entered = true;
                self.step_elapsed = 0.0;
                trace!(handle = %self.handle, step = self.step_index, kind = step.kind(), "entering step");
                self.ramp = enter_step(step, &self.sequence.name, stage, overlays);
            }

            let Some(duration) = step.duration() else {
                self.step_index += 1;
                self.step_entered = false;
                continue;
            };

            let remaining = (duration - self.step_elapsed).max(0.0);
            if budget >= remaining {
                budget -= remaining;
                let next_is_line = matches!(
                    self.sequence.steps.get(self.step_index + 1),
                    Some(Step::PlayLine(_))
                );
                exit_step(step, self.ramp.take(), next_is_line, stage, overlays);
                self.step_index += 1;
                self.step_entered = false;
                continue;
            }

            self.step_elapsed += budget;
            if let Some(ramp) = &self.ramp {
                let alpha = overlays.set(ramp.overlay, ramp.sample(self.step_elapsed));
                stage.overlay.set_overlay_alpha(ramp.overlay, alpha);
            }
            return Progress::Suspended;
        }
    }
}

fn enter_step(
    step: &Step,
    sequence: &str,
    stage: &mut Stage,
    overlays: &OverlayLevels,
) -> Option<FadeRamp> {
    match step {
        Step::Fade {
            overlay,
            target,
            duration,
        } => Some(FadeRamp::new(
            *overlay,
            overlays.get(*overlay),
            *target,
            *duration,
        )),
        Step::Wait { .. } => None,
        Step::PlayLine(line) => {
            stage.dialogue.show_line(line);
            None
        }
        Step::Teleport { target } => {
            stage.world.teleport_player(target);
            None
        }
        Step::SetActive { object, active } => {
            if let Err(err) = stage.world.set_active(object, *active) {
                warn!(sequence, error = %err, "skipping set_active step");
            }
            None
        }
        Step::PlayAudio { clip, looping } => {
            if let Err(err) = stage.audio.play(clip, *looping) {
                warn!(sequence, error = %err, "skipping play_audio step");
            }
            None
        }
    }
}

fn exit_step(
    step: &Step,
    ramp: Option<FadeRamp>,
    next_is_line: bool,
    stage: &mut Stage,
    overlays: &mut OverlayLevels,
) {
    if let Some(ramp) = ramp {
        let alpha = overlays.set(ramp.overlay, ramp.to);
        stage.overlay.set_overlay_alpha(ramp.overlay, alpha);
    }
    if matches!(step, Step::PlayLine(_)) && !next_is_line {
        stage.dialogue.clear_line();
    }
}
