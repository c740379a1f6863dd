//! Collaborators that report to the log instead of an engine.
//!
//! The playback binary has no renderer, mixer or scene graph; these stand in
//! for them so a session can be replayed and read back from the trace.

use daybreak_core::assets::{AudioClipRef, DialogueLine, ObjectRef, Overlay, Transform};
use daybreak_core::error::DomainError;
use daybreak_core::ports::{
    AudioPlayer, DialoguePresenter, MovementController, OverlayRenderer, PromptDisplay, Stage,
    WorldGateway,
};
use tracing::{debug, info, trace};

/// Builds a stage whose collaborators all log.
#[must_use]
pub fn tracing_stage() -> Stage {
    Stage::new(
        Box::new(LoggedMovement),
        Box::new(LoggedDialogue),
        Box::new(LoggedOverlay),
        Box::new(LoggedAudio),
        Box::new(LoggedWorld),
        Box::new(LoggedPrompt),
    )
}

fn require(kind: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::MissingReference(format!("{kind} with empty name")));
    }
    Ok(())
}

/// Movement toggles.
#[derive(Debug, Default)]
pub struct LoggedMovement;

impl MovementController for LoggedMovement {
    fn set_movement_enabled(&mut self, enabled: bool) {
        info!(enabled, "movement");
    }
}

/// Subtitles.
#[derive(Debug, Default)]
pub struct LoggedDialogue;

impl DialoguePresenter for LoggedDialogue {
    fn show_line(&mut self, line: &DialogueLine) {
        info!(
            text = %line.text,
            voice = line.voice.as_ref().map(|v| v.0.as_str()),
            duration = line.duration,
            "subtitle"
        );
    }

    fn clear_line(&mut self) {
        debug!("subtitle cleared");
    }
}

/// Fade overlays. Intermediate ramp values are logged at trace level only.
#[derive(Debug, Default)]
pub struct LoggedOverlay;

impl OverlayRenderer for LoggedOverlay {
    fn set_overlay_alpha(&mut self, overlay: Overlay, alpha: f32) {
        if alpha <= 0.0 || alpha >= 1.0 {
            debug!(?overlay, alpha, "overlay");
        } else {
            trace!(?overlay, alpha, "overlay");
        }
    }
}

/// Audio.
#[derive(Debug, Default)]
pub struct LoggedAudio;

impl AudioPlayer for LoggedAudio {
    fn play(&mut self, clip: &AudioClipRef, looping: bool) -> Result<(), DomainError> {
        require("audio clip", &clip.0)?;
        info!(%clip, looping, "audio");
        Ok(())
    }
}

/// Scene graph.
#[derive(Debug, Default)]
pub struct LoggedWorld;

impl WorldGateway for LoggedWorld {
    fn set_active(&mut self, object: &ObjectRef, active: bool) -> Result<(), DomainError> {
        require("object", &object.0)?;
        debug!(%object, active, "set active");
        Ok(())
    }

    fn teleport_player(&mut self, target: &Transform) {
        info!(position = ?target.position, "teleport");
    }

    fn set_door_open(&mut self, door: &ObjectRef, open: bool) -> Result<(), DomainError> {
        require("door", &door.0)?;
        info!(%door, open, "door");
        Ok(())
    }

    fn load_scene(&mut self, name: &str) {
        info!(scene = name, "load scene");
    }
}

/// Interaction prompt.
#[derive(Debug, Default)]
pub struct LoggedPrompt;

impl PromptDisplay for LoggedPrompt {
    fn show_prompt(&mut self, text: &str) {
        debug!(text, "prompt shown");
    }

    fn hide_prompt(&mut self) {
        debug!("prompt hidden");
    }
}
