//! Collaborator ports: the narrow interfaces through which the core drives
//! rendering, audio, subtitles and the scene graph.
//!
//! The core calls these and never the engine directly. Implementations that
//! resolve names (objects, clips) report unknown names as
//! `DomainError::MissingReference`; callers log and carry on.

use std::fmt;

use crate::assets::{AudioClipRef, DialogueLine, ObjectRef, Overlay, Transform};
use crate::control_lock::ControlLock;
use crate::error::DomainError;

/// Player locomotion. Only the control lock talks to this.
pub trait MovementController {
    /// Enables or disables player-driven movement.
    fn set_movement_enabled(&mut self, enabled: bool);
}

/// Subtitle display plus voice playback.
pub trait DialoguePresenter {
    /// Shows `line` and starts its voice clip, if any.
    fn show_line(&mut self, line: &DialogueLine);

    /// Clears the subtitle.
    fn clear_line(&mut self);
}

/// Full-screen fade overlays.
pub trait OverlayRenderer {
    /// Sets the opacity of `overlay` (0 = transparent, 1 = opaque).
    fn set_overlay_alpha(&mut self, overlay: Overlay, alpha: f32);
}

/// Sound effects and ambient loops.
pub trait AudioPlayer {
    /// Starts `clip`. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingReference` if the clip is unknown.
    fn play(&mut self, clip: &AudioClipRef, looping: bool) -> Result<(), DomainError>;
}

/// Scene graph operations.
pub trait WorldGateway {
    /// Activates or deactivates a scene object.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingReference` if the object is unknown.
    fn set_active(&mut self, object: &ObjectRef, active: bool) -> Result<(), DomainError>;

    /// Moves the player to `target`.
    fn teleport_player(&mut self, target: &Transform);

    /// Opens or closes a sliding door.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingReference` if the door object is unknown.
    fn set_door_open(&mut self, door: &ObjectRef, open: bool) -> Result<(), DomainError>;

    /// Replaces the current scene.
    fn load_scene(&mut self, name: &str);
}

/// The "Press E to ..." prompt.
pub trait PromptDisplay {
    /// Shows `text`.
    fn show_prompt(&mut self, text: &str);

    /// Hides the prompt.
    fn hide_prompt(&mut self);
}

/// Everything the core can act on, bundled for one play session.
pub struct Stage {
    /// The shared movement gate.
    pub lock: ControlLock,
    /// Subtitles and voice.
    pub dialogue: Box<dyn DialoguePresenter>,
    /// Fade overlays.
    pub overlay: Box<dyn OverlayRenderer>,
    /// Sound effects.
    pub audio: Box<dyn AudioPlayer>,
    /// Scene graph.
    pub world: Box<dyn WorldGateway>,
    /// Interaction prompt.
    pub prompt: Box<dyn PromptDisplay>,
}

impl Stage {
    /// Bundles the collaborators. `movement` is handed to a fresh control lock.
    #[must_use]
    pub fn new(
        movement: Box<dyn MovementController>,
        dialogue: Box<dyn DialoguePresenter>,
        overlay: Box<dyn OverlayRenderer>,
        audio: Box<dyn AudioPlayer>,
        world: Box<dyn WorldGateway>,
        prompt: Box<dyn PromptDisplay>,
    ) -> Self {
        Self {
            lock: ControlLock::new(movement),
            dialogue,
            overlay,
            audio,
            world,
            prompt,
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}
