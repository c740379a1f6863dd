//! Shared helpers for runtime integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use daybreak_day_cycle::domain::aggregates::ActionOutcome;
use daybreak_day_cycle::domain::events::DayAdvanced;
use daybreak_day_cycle::domain::state::DayState;
use daybreak_interaction::domain::zone::ZoneTag;
use daybreak_runtime::content::GameContent;
use daybreak_runtime::director::Director;
use daybreak_test_support::{FixedClock, MockRng, RecordingStage, StageLog};

/// Tick length that keeps every timing in these tests exact.
pub const DT: f32 = 0.25;

/// Short timings so whole days fit in a few simulated seconds.
///
/// Consumption takes 1.0s, sleep takes 4.5s, the special day waits 10s and
/// its closing takes 2s.
pub const TEST_CONTENT: &str = r#"
day_cycle:
  timings: { scene_fade: 1.0, sleep_hold: 0.5, sleep_duration: 1.0, interaction_fade: 0.25, interaction_hold: 0.5 }
  audio: { water: gulp, food: crunch, generator_ambient: hum }
  water_repeat_dialogues:
    - lines: [{ text: "Already drank.", duration: 1.0 }]
    - lines: [{ text: "Still not thirsty.", duration: 1.0 }]
  food_repeat_dialogues:
    - lines: [{ text: "Already ate.", duration: 1.0 }]
  sleep_dialogues:
    - lines: [{ text: "Night one.", duration: 1.0 }]
    - lines: [{ text: "Night two.", duration: 1.0 }]
    - lines: [{ text: "Night three.", duration: 1.0 }]
  wake_dialogues:
    - lines: [{ text: "Morning one.", duration: 1.0 }]
    - lines: [{ text: "Morning two.", duration: 1.0 }]
  not_ready_dialogue:
    lines: [{ text: "Not yet.", duration: 1.0 }]
  generator_dialogue:
    lines: [{ text: "Power.", duration: 1.0 }]
  special_day:
    day: 4
    awake_duration: 10.0
    chatter:
      min_interval: 2.0
      max_interval: 3.0
      lines:
        - { text: "Hm.", duration: 0.5 }
        - { text: "So quiet.", duration: 0.5 }
    closing:
      name: closing
      locks_movement: true
      steps:
        - { step: fade, overlay: scene, target: 1.0, duration: 1.0 }
        - { step: play_line, text: "The end.", duration: 1.0 }
    next_scene: Ending

doors:
  card_pickup: keycard
  doors:
    - { id: storage, kind: sliding, object: storage_door }
    - id: lab
      open_in_day: 2
      card_needed: true
      kind: sliding
      object: lab_door
      card_dialogue:
        lines: [{ text: "Need a card.", duration: 1.0 }]

triggers:
  - id: hall
    dialogue:
      lines: [{ text: "Dusty.", duration: 1.0 }]
  - id: window
    dialogue:
      lines: [{ text: "What is that?", duration: 1.0 }]
    cutscene: { bars: bars, main_camera: cam_main, cutscene_camera: cam_window, duration: 2.0 }
"#;

/// A director over recording collaborators, plus the recording.
pub struct Session {
    pub director: Director,
    pub log: StageLog,
}

impl Session {
    /// A started session on day 1.
    pub fn new() -> Self {
        Self::on(DayState::default())
    }

    /// A started session resuming from `state`.
    pub fn on(state: DayState) -> Self {
        let content = GameContent::from_yaml(TEST_CONTENT).unwrap();
        let (stage, log) = RecordingStage::new().build();
        let mut director = Director::with_state(
            content,
            state,
            stage,
            Box::new(FixedClock::standard()),
            Box::new(MockRng),
        );
        director.begin();
        Self { director, log }
    }

    /// Runs `seconds` of simulated time in `DT` steps.
    pub fn run(&mut self, seconds: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            self.director.tick(DT);
            elapsed += DT;
        }
    }

    /// Walks into the zone tagged `tag`, presses the action key and walks out.
    pub fn act(&mut self, tag: ZoneTag) -> Option<ActionOutcome> {
        self.director.on_zone_enter(tag);
        let outcome = self.director.on_action_key();
        self.director.on_zone_exit(tag);
        outcome
    }

    /// How many times `text` was shown as a subtitle.
    pub fn shown(&self, text: &str) -> usize {
        self.log.lines().iter().filter(|l| l.as_str() == text).count()
    }

    /// Records `(day, hunger, thirst)` of every day-advanced event.
    pub fn record_days(&mut self) -> Rc<RefCell<Vec<(u32, f32, f32)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        self.director.subscribe_day_advanced(move |event: &DayAdvanced| {
            sink.borrow_mut().push((event.day, event.hunger, event.thirst));
        });
        seen
    }
}
