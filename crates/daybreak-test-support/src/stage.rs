//! Recording collaborators: a `Stage` whose every call lands in a shared log.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use daybreak_core::assets::{AudioClipRef, DialogueLine, ObjectRef, Overlay, Transform};
use daybreak_core::error::DomainError;
use daybreak_core::ports::{
    AudioPlayer, DialoguePresenter, MovementController, OverlayRenderer, PromptDisplay, Stage,
    WorldGateway,
};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum StageCall {
    /// `set_movement_enabled`.
    Movement(bool),
    /// `show_line` with the line's text.
    ShowLine(String),
    /// `clear_line`.
    ClearLine,
    /// `set_overlay_alpha`.
    Overlay(Overlay, f32),
    /// `play`.
    Audio {
        /// Clip name.
        clip: String,
        /// Whether it loops.
        looping: bool,
    },
    /// `set_active`.
    SetActive {
        /// Object name.
        object: String,
        /// New active state.
        active: bool,
    },
    /// `teleport_player`.
    Teleport(Transform),
    /// `set_door_open`.
    DoorOpen {
        /// Door object name.
        door: String,
        /// New open state.
        open: bool,
    },
    /// `load_scene`.
    LoadScene(String),
    /// `show_prompt`.
    ShowPrompt(String),
    /// `hide_prompt`.
    HidePrompt,
}

/// Shared, cloneable view of everything the stage was asked to do.
#[derive(Debug, Clone, Default)]
pub struct StageLog(Rc<RefCell<Vec<StageCall>>>);

impl StageLog {
    fn push(&self, call: StageCall) {
        self.0.borrow_mut().push(call);
    }

    /// Snapshot of all recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StageCall> {
        self.0.borrow().clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Movement enable/disable notifications, in order.
    #[must_use]
    pub fn movement(&self) -> Vec<bool> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StageCall::Movement(enabled) => Some(*enabled),
                _ => None,
            })
            .collect()
    }

    /// Subtitle texts shown, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StageCall::ShowLine(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Scene names loaded, in order.
    #[must_use]
    pub fn scene_loads(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                StageCall::LoadScene(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// The last alpha written to `overlay`, if any.
    #[must_use]
    pub fn last_alpha(&self, overlay: Overlay) -> Option<f32> {
        self.0.borrow().iter().rev().find_map(|c| match c {
            StageCall::Overlay(o, alpha) if *o == overlay => Some(*alpha),
            _ => None,
        })
    }

    /// How many recorded calls satisfy `pred`.
    pub fn count(&self, pred: impl Fn(&StageCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Whether any recorded call equals `call`.
    #[must_use]
    pub fn contains(&self, call: &StageCall) -> bool {
        self.0.borrow().iter().any(|c| c == call)
    }
}

/// Builder for a `Stage` backed entirely by recording fakes.
///
/// By default every object and clip name resolves. Restricting the known
/// names makes the fakes answer `DomainError::MissingReference` for the rest.
#[derive(Debug, Default)]
pub struct RecordingStage {
    known_objects: Option<HashSet<String>>,
    known_clips: Option<HashSet<String>>,
}

impl RecordingStage {
    /// A recording stage where every name resolves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only these object names resolve.
    #[must_use]
    pub fn with_known_objects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_objects = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Only these clip names resolve.
    #[must_use]
    pub fn with_known_clips<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_clips = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the stage and the log its collaborators write to.
    #[must_use]
    pub fn build(self) -> (Stage, StageLog) {
        let log = StageLog::default();
        let stage = Stage::new(
            Box::new(Recorder {
                log: log.clone(),
                known: None,
            }),
            Box::new(Recorder {
                log: log.clone(),
                known: None,
            }),
            Box::new(Recorder {
                log: log.clone(),
                known: None,
            }),
            Box::new(Recorder {
                log: log.clone(),
                known: self.known_clips,
            }),
            Box::new(Recorder {
                log: log.clone(),
                known: self.known_objects,
            }),
            Box::new(Recorder {
                log: log.clone(),
                known: None,
            }),
        );
        (stage, log)
    }
}

struct Recorder {
    log: StageLog,
    known: Option<HashSet<String>>,
}

impl Recorder {
    fn resolve(&self, kind: &str, name: &str) -> Result<(), DomainError> {
        match &self.known {
            Some(known) if !known.contains(name) => {
                Err(DomainError::MissingReference(format!("{kind} '{name}'")))
            }
            _ => Ok(()),
        }
    }
}

impl MovementController for Recorder {
    fn set_movement_enabled(&mut self, enabled: bool) {
        self.log.push(StageCall::Movement(enabled));
    }
}

impl DialoguePresenter for Recorder {
    fn show_line(&mut self, line: &DialogueLine) {
        self.log.push(StageCall::ShowLine(line.text.clone()));
    }

    fn clear_line(&mut self) {
        self.log.push(StageCall::ClearLine);
    }
}

impl OverlayRenderer for Recorder {
    fn set_overlay_alpha(&mut self, overlay: Overlay, alpha: f32) {
        self.log.push(StageCall::Overlay(overlay, alpha));
    }
}

impl AudioPlayer for Recorder {
    fn play(&mut self, clip: &AudioClipRef, looping: bool) -> Result<(), DomainError> {
        self.resolve("audio clip", &clip.0)?;
        self.log.push(StageCall::Audio {
            clip: clip.0.clone(),
            looping,
        });
        Ok(())
    }
}

impl WorldGateway for Recorder {
    fn set_active(&mut self, object: &ObjectRef, active: bool) -> Result<(), DomainError> {
        self.resolve("object", &object.0)?;
        self.log.push(StageCall::SetActive {
            object: object.0.clone(),
            active,
        });
        Ok(())
    }

    fn teleport_player(&mut self, target: &Transform) {
        self.log.push(StageCall::Teleport(*target));
    }

    fn set_door_open(&mut self, door: &ObjectRef, open: bool) -> Result<(), DomainError> {
        self.resolve("door", &door.0)?;
        self.log.push(StageCall::DoorOpen {
            door: door.0.clone(),
            open,
        });
        Ok(())
    }

    fn load_scene(&mut self, name: &str) {
        self.log.push(StageCall::LoadScene(name.to_owned()));
    }
}

impl PromptDisplay for Recorder {
    fn show_prompt(&mut self, text: &str) {
        self.log.push(StageCall::ShowPrompt(text.to_owned()));
    }

    fn hide_prompt(&mut self) {
        self.log.push(StageCall::HidePrompt);
    }
}
