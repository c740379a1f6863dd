//! Steps, sequences and dialogue scripts.

use daybreak_core::assets::{AudioClipRef, DialogueLine, ObjectRef, Overlay, Transform};
use serde::{Deserialize, Serialize};

/// One unit of a sequence.
///
/// `Fade`, `Wait` and `PlayLine` suspend the sequence for their duration;
/// the rest take effect immediately and the sequence moves on in the same
/// tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Linearly move an overlay's opacity from its current value to `target`.
    Fade {
        /// Overlay to drive.
        #[serde(default = "default_overlay")]
        overlay: Overlay,
        /// Final opacity, clamped to `[0, 1]`.
        target: f32,
        /// Seconds the ramp takes.
        duration: f32,
    },
    /// Do nothing for `duration` seconds.
    Wait {
        /// Seconds to hold.
        duration: f32,
    },
    /// Show a subtitle (and start its voice) and hold for the line's duration.
    PlayLine(DialogueLine),
    /// Move the player.
    Teleport {
        /// Destination.
        target: Transform,
    },
    /// Activate or deactivate a scene object.
    SetActive {
        /// Object to toggle.
        object: ObjectRef,
        /// New state.
        active: bool,
    },
    /// Start an audio clip. Fire-and-forget.
    PlayAudio {
        /// Clip to play.
        clip: AudioClipRef,
        /// Keep playing until the scene ends.
        #[serde(default)]
        looping: bool,
    },
}

const fn default_overlay() -> Overlay {
    Overlay::Scene
}

impl Step {
    /// How long the step suspends its sequence, or `None` if it is instantaneous.
    #[must_use]
    pub fn duration(&self) -> Option<f32> {
        match self {
            Self::Fade { duration, .. } | Self::Wait { duration } => Some(duration.max(0.0)),
            Self::PlayLine(line) => Some(line.duration.max(0.0)),
            Self::Teleport { .. } | Self::SetActive { .. } | Self::PlayAudio { .. } => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fade { .. } => "fade",
            Self::Wait { .. } => "wait",
            Self::PlayLine(_) => "play_line",
            Self::Teleport { .. } => "teleport",
            Self::SetActive { .. } => "set_active",
            Self::PlayAudio { .. } => "play_audio",
        }
    }
}

/// An immutable, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// Name used in logs and completion reports.
    pub name: String,
    /// Whether the sequence holds a control-lock token while it runs.
    #[serde(default)]
    pub locks_movement: bool,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Sequence {
    /// An empty, non-locking sequence.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locks_movement: false,
            steps: Vec::new(),
        }
    }

    /// Marks the sequence as suppressing player movement while it runs.
    #[must_use]
    pub fn locking(mut self) -> Self {
        self.locks_movement = true;
        self
    }

    /// Appends an arbitrary step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends a fade.
    #[must_use]
    pub fn fade(self, overlay: Overlay, target: f32, duration: f32) -> Self {
        self.step(Step::Fade {
            overlay,
            target,
            duration,
        })
    }

    /// Appends a wait.
    #[must_use]
    pub fn wait(self, duration: f32) -> Self {
        self.step(Step::Wait { duration })
    }

    /// Appends a dialogue line.
    #[must_use]
    pub fn line(self, line: DialogueLine) -> Self {
        self.step(Step::PlayLine(line))
    }

    /// Appends a teleport.
    #[must_use]
    pub fn teleport(self, target: Transform) -> Self {
        self.step(Step::Teleport { target })
    }

    /// Appends an object toggle.
    #[must_use]
    pub fn set_active(self, object: ObjectRef, active: bool) -> Self {
        self.step(Step::SetActive { object, active })
    }

    /// Appends an audio cue.
    #[must_use]
    pub fn play_audio(self, clip: AudioClipRef, looping: bool) -> Self {
        self.step(Step::PlayAudio { clip, looping })
    }

    /// Appends every step of a dialogue script.
    #[must_use]
    pub fn dialogue(mut self, script: &DialogueScript) -> Self {
        self.steps.extend(script.steps());
        self
    }

    /// Whether the sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all step durations.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.steps.iter().filter_map(Step::duration).sum()
    }
}

/// A dialogue "object": an optional scene object shown while its lines play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    /// Object activated for the duration of the dialogue.
    #[serde(default)]
    pub object: Option<ObjectRef>,
    /// Lines in order.
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

impl DialogueScript {
    /// A script made of `lines` with no backing object.
    #[must_use]
    pub fn from_lines(lines: Vec<DialogueLine>) -> Self {
        Self {
            object: None,
            lines,
        }
    }

    /// Whether there is nothing to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total seconds the lines stay on screen.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.lines.iter().map(|l| l.duration.max(0.0)).sum()
    }

    /// The steps that play this script.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.lines.len() + 2);
        if let Some(object) = &self.object {
            steps.push(Step::SetActive {
                object: object.clone(),
                active: true,
            });
        }
        steps.extend(self.lines.iter().cloned().map(Step::PlayLine));
        if let Some(object) = &self.object {
            steps.push(Step::SetActive {
                object: object.clone(),
                active: false,
            });
        }
        steps
    }

    /// Wraps the script in a non-locking sequence.
    #[must_use]
    pub fn to_sequence(&self, name: impl Into<String>) -> Sequence {
        Sequence::new(name).dialogue(self)
    }
}
