//! Day-cycle content: timings, per-day dialogue tables, the special day.
//!
//! Content is data. Everything here deserializes from YAML with defaults
//! for the timings, so a content file only needs the dialogue it uses.

use daybreak_core::assets::{AudioClipRef, ObjectRef, Overlay};
use daybreak_core::error::DomainError;
use daybreak_sequence::domain::steps::{DialogueScript, Sequence};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::chatter::ChatterConfig;
use super::readiness::ReadinessRules;
use super::state::Resource;

/// Durations, in seconds, of the fixed parts of each sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Scene fade to and from black.
    pub scene_fade: f32,
    /// Black-screen hold before the sleep dialogue.
    pub sleep_hold: f32,
    /// Black-screen hold after the sleep dialogue.
    pub sleep_duration: f32,
    /// Consumption flash fade in and out.
    pub interaction_fade: f32,
    /// Consumption flash hold.
    pub interaction_hold: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            scene_fade: 2.0,
            sleep_hold: 1.0,
            sleep_duration: 5.0,
            interaction_fade: 0.5,
            interaction_hold: 1.5,
        }
    }
}

/// Audio cues used by the day cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCues {
    /// Played when drinking.
    pub water: Option<AudioClipRef>,
    /// Played when eating.
    pub food: Option<AudioClipRef>,
    /// Loop started when the generator turns on.
    pub generator_ambient: Option<AudioClipRef>,
}

/// A scene object switched on or off when a given day starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayObject {
    /// Day on which the change happens.
    pub day: u32,
    /// Object to toggle.
    pub object: ObjectRef,
    /// New state.
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

/// The long, time-gated day that ends the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDay {
    /// Which day is special.
    #[serde(default = "default_special_day")]
    pub day: u32,
    /// Seconds the player must stay awake before the closing plays.
    #[serde(default = "default_awake_duration")]
    pub awake_duration: f32,
    /// Random lines spoken while waiting.
    #[serde(default)]
    pub chatter: ChatterConfig,
    /// Played on the override track once the wait is over.
    pub closing: Sequence,
    /// Scene loaded after the closing.
    pub next_scene: String,
}

const fn default_special_day() -> u32 {
    4
}

const fn default_awake_duration() -> f32 {
    120.0
}

const fn default_consumption_amount() -> f32 {
    5.0
}

/// All day-cycle content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCycleContent {
    /// Fixed sequence timings.
    #[serde(default)]
    pub timings: Timings,
    /// Meter increase per water or food consumption.
    #[serde(default = "default_consumption_amount")]
    pub consumption_amount: f32,
    /// Audio cues.
    #[serde(default)]
    pub audio: AudioCues,
    /// Sleep readiness rules.
    #[serde(default)]
    pub readiness: ReadinessRules,
    /// "Already drank today" lines, indexed by day.
    #[serde(default)]
    pub water_repeat_dialogues: Vec<DialogueScript>,
    /// "Already ate today" lines, indexed by day.
    #[serde(default)]
    pub food_repeat_dialogues: Vec<DialogueScript>,
    /// Played on the black screen while sleeping, indexed by the day being ended.
    #[serde(default)]
    pub sleep_dialogues: Vec<DialogueScript>,
    /// Played on waking, indexed by the day being started.
    #[serde(default)]
    pub wake_dialogues: Vec<DialogueScript>,
    /// Played when the bed refuses the player.
    #[serde(default)]
    pub not_ready_dialogue: DialogueScript,
    /// Played when the generator turns on.
    #[serde(default)]
    pub generator_dialogue: DialogueScript,
    /// Objects toggled at the start of specific days.
    #[serde(default)]
    pub day_objects: Vec<DayObject>,
    /// The time-gated final day, if the content has one.
    #[serde(default)]
    pub special_day: Option<SpecialDay>,
}

impl Default for DayCycleContent {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            consumption_amount: default_consumption_amount(),
            audio: AudioCues::default(),
            readiness: ReadinessRules::default(),
            water_repeat_dialogues: Vec::new(),
            food_repeat_dialogues: Vec::new(),
            sleep_dialogues: Vec::new(),
            wake_dialogues: Vec::new(),
            not_ready_dialogue: DialogueScript::default(),
            generator_dialogue: DialogueScript::default(),
            day_objects: Vec::new(),
            special_day: None,
        }
    }
}

fn per_day<'a>(
    table: &'static str,
    scripts: &'a [DialogueScript],
    day: u32,
) -> Result<&'a DialogueScript, DomainError> {
    day.checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| scripts.get(i))
        .ok_or(DomainError::InvalidDayIndex {
            table,
            day,
            available: scripts.len(),
        })
}

/// Wraps `script` in a named, non-locking sequence.
///
/// # Errors
///
/// Returns `DomainError::MissingReference` if the script has no lines.
pub fn dialogue_sequence(
    name: impl Into<String>,
    script: &DialogueScript,
) -> Result<Sequence, DomainError> {
    let name = name.into();
    if script.is_empty() {
        return Err(DomainError::MissingReference(format!("dialogue '{name}'")));
    }
    Ok(script.to_sequence(name))
}

impl DayCycleContent {
    /// The "already consumed" dialogue for `resource` on `day`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayIndex` if the table has no entry for
    /// `day`, or `DomainError::Validation` for the generator, which has none.
    pub fn repeat_dialogue(
        &self,
        resource: Resource,
        day: u32,
    ) -> Result<&DialogueScript, DomainError> {
        match resource {
            Resource::Water => per_day("water_repeat_dialogues", &self.water_repeat_dialogues, day),
            Resource::Food => per_day("food_repeat_dialogues", &self.food_repeat_dialogues, day),
            Resource::Generator => Err(DomainError::Validation(
                "the generator has no repeat dialogue".to_owned(),
            )),
        }
    }

    /// The dialogue played while sleeping at the end of `day`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayIndex` if the table is too short.
    pub fn sleep_dialogue(&self, day: u32) -> Result<&DialogueScript, DomainError> {
        per_day("sleep_dialogues", &self.sleep_dialogues, day)
    }

    /// The dialogue played on waking into `day`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayIndex` if the table is too short.
    pub fn wake_dialogue(&self, day: u32) -> Result<&DialogueScript, DomainError> {
        per_day("wake_dialogues", &self.wake_dialogues, day)
    }

    /// Whether `day` is the configured special day.
    #[must_use]
    pub fn is_special_day(&self, day: u32) -> bool {
        self.special_day.as_ref().is_some_and(|s| s.day == day)
    }

    /// Scene fade from black that opens the session.
    #[must_use]
    pub fn opening_sequence(&self) -> Sequence {
        Sequence::new("opening").fade(Overlay::Scene, 0.0, self.timings.scene_fade)
    }

    /// Flash, sound and hold for drinking or eating.
    #[must_use]
    pub fn consumption_sequence(&self, resource: Resource) -> Sequence {
        let t = &self.timings;
        let clip = match resource {
            Resource::Water => self.audio.water.as_ref(),
            Resource::Food => self.audio.food.as_ref(),
            Resource::Generator => None,
        };
        let mut seq = Sequence::new(format!("consume_{resource}"))
            .locking()
            .fade(Overlay::Interaction, 1.0, t.interaction_fade);
        if let Some(clip) = clip {
            seq = seq.play_audio(clip.clone(), false);
        }
        seq.wait(t.interaction_hold)
            .fade(Overlay::Interaction, 0.0, t.interaction_fade)
    }

    /// Ambient loop plus the generator dialogue. Does not lock movement.
    #[must_use]
    pub fn generator_sequence(&self) -> Sequence {
        let mut seq = Sequence::new("generator_on");
        if let Some(clip) = &self.audio.generator_ambient {
            seq = seq.play_audio(clip.clone(), true);
        }
        seq.dialogue(&self.generator_dialogue)
    }

    /// Fade to black, hold, the day's sleep dialogue, hold, fade back.
    ///
    /// A missing sleep dialogue for `day` is logged and left out.
    #[must_use]
    pub fn sleep_sequence(&self, day: u32) -> Sequence {
        let t = &self.timings;
        let mut seq = Sequence::new(format!("sleep_day_{day}"))
            .locking()
            .fade(Overlay::Scene, 1.0, t.scene_fade)
            .wait(t.sleep_hold);
        match self.sleep_dialogue(day) {
            Ok(script) => seq = seq.dialogue(script),
            Err(err) => warn!(day, error = %err, "skipping sleep dialogue"),
        }
        seq.wait(t.sleep_duration).fade(Overlay::Scene, 0.0, t.scene_fade)
    }

    /// `SetActive` steps for the objects configured for `day`, if any.
    #[must_use]
    pub fn day_objects_sequence(&self, day: u32) -> Option<Sequence> {
        let seq = self
            .day_objects
            .iter()
            .filter(|o| o.day == day)
            .fold(Sequence::new(format!("day_{day}_objects")), |seq, o| {
                seq.set_active(o.object.clone(), o.active)
            });
        (!seq.is_empty()).then_some(seq)
    }
}
