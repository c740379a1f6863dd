//! References to engine-owned things and the small value types shared by
//! sequences and content.
//!
//! The core never resolves these itself; collaborators do, and report
//! `DomainError::MissingReference` when a name does not resolve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a scene object the world collaborator can toggle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub String);

impl ObjectRef {
    /// Creates a reference from any string-like name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an audio clip (voice line, sound effect, ambient loop).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioClipRef(pub String);

impl AudioClipRef {
    /// Creates a reference from any string-like name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for AudioClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full-screen overlays the fade collaborator can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    /// The black scene fade used for sleep, teleports and scene changes.
    Scene,
    /// The short flash shown while consuming a resource.
    Interaction,
}

/// World-space position and orientation (quaternion `x, y, z, w`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world units.
    pub position: [f32; 3],
    /// Rotation quaternion.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

impl Transform {
    /// A transform at `position` with no rotation.
    #[must_use]
    pub const fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

const fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// One subtitle line with its optional voice clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Subtitle text.
    pub text: String,
    /// Voice clip played alongside the subtitle. Playback is fire-and-forget.
    #[serde(default)]
    pub voice: Option<AudioClipRef>,
    /// Seconds the subtitle stays on screen.
    #[serde(default = "default_line_duration")]
    pub duration: f32,
}

impl DialogueLine {
    /// A line without voice, shown for `duration` seconds.
    #[must_use]
    pub fn new(text: impl Into<String>, duration: f32) -> Self {
        Self {
            text: text.into(),
            voice: None,
            duration,
        }
    }

    /// Attaches a voice clip to the line.
    #[must_use]
    pub fn with_voice(mut self, clip: AudioClipRef) -> Self {
        self.voice = Some(clip);
        self
    }
}

const fn default_line_duration() -> f32 {
    3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_line_defaults_from_json() {
        let line: DialogueLine = serde_json::from_str(r#"{"text":"Hello"}"#).unwrap();

        assert_eq!(line.text, "Hello");
        assert!(line.voice.is_none());
        assert!((line.duration - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_transform_rotation_defaults_to_identity() {
        let t: Transform = serde_json::from_str(r#"{"position":[1.0,2.0,3.0]}"#).unwrap();

        assert_eq!(t, Transform::at([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_overlay_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Overlay::Interaction).unwrap(),
            "\"interaction\""
        );
    }
}
