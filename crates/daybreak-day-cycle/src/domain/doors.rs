//! Door rules: day-gated, optionally card-gated sliding and teleport doors.
//!
//! The registry only decides. The caller runs the resulting sequence or
//! door call and reports back which sequences belong to which door.

use std::collections::BTreeSet;

use daybreak_core::assets::{ObjectRef, Overlay, Transform};
use daybreak_sequence::application::scheduler::SequenceHandle;
use daybreak_sequence::domain::steps::{DialogueScript, Sequence};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a door does once the player may use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DoorKind {
    /// Opens on enter, closes on exit.
    Sliding {
        /// The door object.
        object: ObjectRef,
    },
    /// Fades out, moves the player, fades back in.
    Teleport {
        /// Destination.
        target: Transform,
        /// Seconds for each half of the fade.
        #[serde(default = "default_teleport_fade")]
        fade_duration: f32,
    },
}

const fn default_teleport_fade() -> f32 {
    1.0
}

/// One door volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorRule {
    /// Identifier reported by the overlap collaborator.
    pub id: String,
    /// First day on which the door works.
    #[serde(default = "default_open_in_day")]
    pub open_in_day: u32,
    /// Whether the keycard is required.
    #[serde(default)]
    pub card_needed: bool,
    /// Behavior once usable.
    #[serde(flatten)]
    pub kind: DoorKind,
    /// Played when the card is needed and missing.
    #[serde(default)]
    pub card_dialogue: DialogueScript,
}

const fn default_open_in_day() -> u32 {
    1
}

/// Door content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoorsContent {
    /// Keycard pickup object, hidden once the card is taken.
    #[serde(default)]
    pub card_pickup: Option<ObjectRef>,
    /// Every door in the scene.
    #[serde(default)]
    pub doors: Vec<DoorRule>,
}

/// Outcome of the player entering a door volume.
#[derive(Debug, Clone, PartialEq)]
pub enum DoorDecision {
    /// No rule with that id.
    Unknown,
    /// Too early in the week; nothing happens.
    NotYet,
    /// The door is busy with an earlier sequence; the entry is ignored.
    Busy,
    /// Already open.
    AlreadyOpen,
    /// Card required and missing: play this.
    NeedsCard(Sequence),
    /// Open this sliding door.
    Open(ObjectRef),
    /// Run this locking teleport sequence.
    Teleport(Sequence),
}

/// Door rules plus the card flag and per-door runtime state.
#[derive(Debug, Default)]
pub struct DoorRegistry {
    content: DoorsContent,
    has_card: bool,
    open: BTreeSet<String>,
    in_flight: Vec<(String, SequenceHandle)>,
}

impl DoorRegistry {
    /// A registry for `content` with no card.
    #[must_use]
    pub fn new(content: DoorsContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Sets the keycard flag.
    pub fn set_card(&mut self, has_card: bool) {
        self.has_card = has_card;
    }

    /// Whether the player holds the keycard.
    #[must_use]
    pub const fn has_card(&self) -> bool {
        self.has_card
    }

    /// The keycard pickup object, if configured.
    #[must_use]
    pub const fn card_pickup(&self) -> Option<&ObjectRef> {
        self.content.card_pickup.as_ref()
    }

    /// Decides what entering door `id` on `day` does.
    pub fn on_enter(&mut self, id: &str, day: u32) -> DoorDecision {
        let Some(rule) = self.content.doors.iter().find(|d| d.id == id) else {
            return DoorDecision::Unknown;
        };
        if day < rule.open_in_day {
            debug!(door = id, day, open_in_day = rule.open_in_day, "door not usable yet");
            return DoorDecision::NotYet;
        }
        if self.in_flight.iter().any(|(door, _)| door == id) {
            return DoorDecision::Busy;
        }
        if rule.card_needed && !self.has_card {
            return DoorDecision::NeedsCard(
                rule.card_dialogue.to_sequence(format!("door_{id}_card")),
            );
        }
        match &rule.kind {
            DoorKind::Sliding { object } => {
                if self.open.insert(id.to_owned()) {
                    DoorDecision::Open(object.clone())
                } else {
                    DoorDecision::AlreadyOpen
                }
            }
            DoorKind::Teleport {
                target,
                fade_duration,
            } => DoorDecision::Teleport(
                Sequence::new(format!("door_{id}_teleport"))
                    .locking()
                    .fade(Overlay::Scene, 1.0, *fade_duration)
                    .teleport(*target)
                    .fade(Overlay::Scene, 0.0, *fade_duration),
            ),
        }
    }

    /// The player left door `id`. Returns the sliding door to close, if it
    /// was open.
    pub fn on_exit(&mut self, id: &str) -> Option<ObjectRef> {
        if !self.open.remove(id) {
            return None;
        }
        self.content
            .doors
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| match &d.kind {
                DoorKind::Sliding { object } => Some(object.clone()),
                DoorKind::Teleport { .. } => None,
            })
    }

    /// Records that `handle` runs on behalf of door `id`.
    pub fn track(&mut self, id: &str, handle: SequenceHandle) {
        self.in_flight.push((id.to_owned(), handle));
    }

    /// Forgets `handle`. Returns `true` if it belonged to a door.
    pub fn on_sequence_finished(&mut self, handle: SequenceHandle) -> bool {
        let before = self.in_flight.len();
        self.in_flight.retain(|(_, h)| *h != handle);
        self.in_flight.len() != before
    }

    /// Ids of doors whose first usable day is `day`.
    #[must_use]
    pub fn newly_unlocked(&self, day: u32) -> Vec<String> {
        self.content
            .doors
            .iter()
            .filter(|d| d.open_in_day == day)
            .map(|d| d.id.clone())
            .collect()
    }
}
