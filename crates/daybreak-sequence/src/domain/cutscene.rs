//! Camera-swap cutscenes and the one-shot triggers that start them.

use daybreak_core::assets::ObjectRef;
use serde::{Deserialize, Serialize};

use super::steps::{DialogueScript, Sequence};

/// Data for one cutscene: cinematic bars and a camera swap around a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutsceneScript {
    /// Letterbox bars shown for the whole cutscene.
    #[serde(default)]
    pub bars: Option<ObjectRef>,
    /// Gameplay camera, disabled while the cutscene runs.
    #[serde(default)]
    pub main_camera: Option<ObjectRef>,
    /// Cutscene camera, enabled while the cutscene runs.
    #[serde(default)]
    pub cutscene_camera: Option<ObjectRef>,
    /// Minimum length of the cutscene in seconds.
    #[serde(default = "default_cutscene_duration")]
    pub duration: f32,
    /// Dialogue played at the start of the cutscene.
    #[serde(default)]
    pub dialogue: DialogueScript,
}

const fn default_cutscene_duration() -> f32 {
    5.0
}

impl CutsceneScript {
    /// Builds the locking sequence for this cutscene.
    ///
    /// The hold after the dialogue pads the cutscene out to `duration`; a
    /// dialogue longer than `duration` is not cut short.
    #[must_use]
    pub fn to_sequence(&self, name: impl Into<String>) -> Sequence {
        let mut seq = Sequence::new(name).locking();
        if let Some(bars) = &self.bars {
            seq = seq.set_active(bars.clone(), true);
        }
        if let Some(camera) = &self.main_camera {
            seq = seq.set_active(camera.clone(), false);
        }
        if let Some(camera) = &self.cutscene_camera {
            seq = seq.set_active(camera.clone(), true);
        }
        seq = seq.dialogue(&self.dialogue);
        let hold = (self.duration - self.dialogue.duration()).max(0.0);
        if hold > 0.0 {
            seq = seq.wait(hold);
        }
        if let Some(camera) = &self.main_camera {
            seq = seq.set_active(camera.clone(), true);
        }
        if let Some(camera) = &self.cutscene_camera {
            seq = seq.set_active(camera.clone(), false);
        }
        if let Some(bars) = &self.bars {
            seq = seq.set_active(bars.clone(), false);
        }
        seq
    }
}

/// Where a trigger's sequence runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerPlan {
    /// Plain dialogue on the main track.
    Main(Sequence),
    /// A cutscene on the override track.
    Override(Sequence),
}

/// A one-shot trigger volume: a dialogue, optionally staged as a cutscene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerScript {
    /// Identifier reported by the overlap collaborator.
    pub id: String,
    /// What is said.
    #[serde(default)]
    pub dialogue: DialogueScript,
    /// Camera staging. The trigger's dialogue is used when the cutscene has none.
    #[serde(default)]
    pub cutscene: Option<CutsceneScript>,
}

impl TriggerScript {
    /// Builds the sequence to run when the player first enters the trigger.
    #[must_use]
    pub fn plan(&self) -> TriggerPlan {
        let name = format!("trigger_{}", self.id);
        match &self.cutscene {
            Some(cutscene) if cutscene.dialogue.is_empty() => {
                let staged = CutsceneScript {
                    dialogue: self.dialogue.clone(),
                    ..cutscene.clone()
                };
                TriggerPlan::Override(staged.to_sequence(name))
            }
            Some(cutscene) => TriggerPlan::Override(cutscene.to_sequence(name)),
            None => TriggerPlan::Main(self.dialogue.to_sequence(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use daybreak_core::assets::DialogueLine;

    use super::*;
    use crate::domain::steps::Step;

    fn script() -> CutsceneScript {
        CutsceneScript {
            bars: Some(ObjectRef::new("bars")),
            main_camera: Some(ObjectRef::new("main_cam")),
            cutscene_camera: Some(ObjectRef::new("cut_cam")),
            duration: 5.0,
            dialogue: DialogueScript::from_lines(vec![DialogueLine::new("Look.", 2.0)]),
        }
    }

    #[test]
    fn test_cutscene_swaps_cameras_and_pads_to_duration() {
        // Act
        let seq = script().to_sequence("hallway");

        // Assert
        assert!(seq.locks_movement);
        let kinds: Vec<&str> = seq.steps.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "set_active",
                "set_active",
                "set_active",
                "play_line",
                "wait",
                "set_active",
                "set_active",
                "set_active"
            ]
        );
        assert!((seq.total_duration() - 5.0).abs() < f32::EPSILON);
        assert_eq!(
            seq.steps.last(),
            Some(&Step::SetActive {
                object: ObjectRef::new("bars"),
                active: false
            })
        );
    }

    #[test]
    fn test_long_dialogue_is_not_padded() {
        let mut cutscene = script();
        cutscene.duration = 1.0;

        let seq = cutscene.to_sequence("short");

        assert!(seq.steps.iter().all(|s| s.kind() != "wait"));
    }

    #[test]
    fn test_trigger_without_cutscene_plays_on_main_track() {
        let trigger = TriggerScript {
            id: "radio".into(),
            dialogue: DialogueScript::from_lines(vec![DialogueLine::new("Static.", 2.0)]),
            cutscene: None,
        };

        let plan = trigger.plan();

        match plan {
            TriggerPlan::Main(seq) => {
                assert_eq!(seq.name, "trigger_radio");
                assert!(!seq.locks_movement);
            }
            TriggerPlan::Override(_) => panic!("expected main track"),
        }
    }

    #[test]
    fn test_trigger_cutscene_borrows_trigger_dialogue() {
        // Arrange
        let mut cutscene = script();
        cutscene.dialogue = DialogueScript::default();
        let trigger = TriggerScript {
            id: "window".into(),
            dialogue: DialogueScript::from_lines(vec![DialogueLine::new("Outside.", 2.0)]),
            cutscene: Some(cutscene),
        };

        // Act
        let plan = trigger.plan();

        // Assert
        let TriggerPlan::Override(seq) = plan else {
            panic!("expected override track");
        };
        assert!(seq.locks_movement);
        assert!(seq
            .steps
            .contains(&Step::PlayLine(DialogueLine::new("Outside.", 2.0))));
    }
}
