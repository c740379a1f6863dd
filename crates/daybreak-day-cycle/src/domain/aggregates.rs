//! The day-cycle state machine.
//!
//! `DayCycle` reacts to three things: gated actions from the interaction
//! gate, completion reports from the sequence scheduler, and the host tick.
//! Effects of an action (flags, meters, the day increment) are committed
//! when the sequence that presents it completes, never when it starts.

use std::fmt;

use daybreak_core::assets::Overlay;
use daybreak_core::clock::Clock;
use daybreak_core::error::DomainError;
use daybreak_core::ports::Stage;
use daybreak_core::rng::DeterministicRng;
use daybreak_interaction::domain::commands::RequestGatedAction;
use daybreak_interaction::domain::zone::ZoneTag;
use daybreak_sequence::application::scheduler::{
    FinishedSequence, SequenceHandle, SequenceScheduler,
};
use daybreak_sequence::domain::steps::{DialogueScript, Sequence};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::chatter::Chatter;
use super::content::{DayCycleContent, dialogue_sequence};
use super::events::{DayAdvanced, DayAdvancedSubscriber, DayEventBus};
use super::state::{DayState, Resource};

/// What the day cycle needs from the session to act.
pub struct CycleContext<'a> {
    /// Runs the sequences the cycle starts.
    pub scheduler: &'a mut SequenceScheduler,
    /// Collaborators.
    pub stage: &'a mut Stage,
    /// Stamps published events.
    pub clock: &'a dyn Clock,
    /// Chatter timing and picks.
    pub rng: &'a mut dyn DeterministicRng,
}

/// Where the cycle is within the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    /// Free to act; not yet ready to sleep.
    Awake,
    /// A consumption sequence is running.
    ConsumingResource(Resource),
    /// Awake, and the day's readiness rule is satisfied.
    SleepPending,
    /// The sleep sequence is running.
    Sleeping,
    /// The special day's closing has taken over. Terminal.
    CutsceneOverride,
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Awake => f.write_str("awake"),
            Self::ConsumingResource(resource) => write!(f, "consuming {resource}"),
            Self::SleepPending => f.write_str("sleep pending"),
            Self::Sleeping => f.write_str("sleeping"),
            Self::CutsceneOverride => f.write_str("cutscene override"),
        }
    }
}

/// Result of handing a gated action to the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A sequence is presenting the action. The gate stays busy until it finishes.
    InFlight(SequenceHandle),
    /// Nothing to present. The gate can be released now.
    Completed,
    /// The action does not apply in the current phase.
    Rejected(DomainError),
}

impl ActionOutcome {
    /// Whether the interaction gate should stay busy.
    #[must_use]
    pub const fn holds_gate(&self) -> bool {
        matches!(self, Self::InFlight(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Consume(Resource),
    Sleep { correlation_id: Uuid },
    Closing,
}

#[derive(Debug)]
struct SpecialRoutine {
    elapsed: f32,
    chatter: Chatter,
    chatter_handle: Option<SequenceHandle>,
    fired: bool,
}

/// Aggregate root for one play session's days.
#[derive(Debug)]
pub struct DayCycle {
    /// Aggregate identifier.
    pub id: Uuid,
    content: DayCycleContent,
    state: DayState,
    phase: DayPhase,
    bus: DayEventBus,
    gate_handle: Option<SequenceHandle>,
    pending: Vec<(SequenceHandle, Pending)>,
    special: Option<SpecialRoutine>,
    scene_loaded: Option<String>,
    events_published: i64,
}

impl DayCycle {
    /// A cycle on day 1 with nothing consumed.
    #[must_use]
    pub fn new(content: DayCycleContent) -> Self {
        Self::with_state(content, DayState::default())
    }

    /// A cycle resuming from `state`.
    #[must_use]
    pub fn with_state(content: DayCycleContent, state: DayState) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            state,
            phase: DayPhase::Awake,
            bus: DayEventBus::new(),
            gate_handle: None,
            pending: Vec::new(),
            special: None,
            scene_loaded: None,
            events_published: 0,
        }
    }

    /// Registers a day-advanced subscriber.
    pub fn subscribe(&mut self, subscriber: impl DayAdvancedSubscriber + 'static) {
        self.bus.subscribe(subscriber);
    }

    /// Opens the scene: black screen fading in, the day's wake-up dialogue,
    /// and the special-day timer if today is that day.
    pub fn begin(&mut self, ctx: &mut CycleContext<'_>) {
        ctx.scheduler.set_overlay_alpha(Overlay::Scene, 1.0, ctx.stage);
        ctx.scheduler
            .run_sequentially(self.content.opening_sequence(), ctx.stage);
        self.play_wake_dialogue(ctx);
        self.refresh_readiness();
        if self.content.is_special_day(self.state.day) {
            self.start_special_routine(ctx);
        }
        info!(cycle_id = %self.id, day = self.state.day, "day cycle started");
    }

    /// Handles a gated action from the interaction gate.
    pub fn handle_action(
        &mut self,
        command: &RequestGatedAction,
        ctx: &mut CycleContext<'_>,
    ) -> ActionOutcome {
        let tag = command.tag;
        if !matches!(self.phase, DayPhase::Awake | DayPhase::SleepPending) {
            return ActionOutcome::Rejected(DomainError::Validation(format!(
                "{tag} action ignored while {}",
                self.phase
            )));
        }
        let outcome = match tag {
            ZoneTag::Water => self.consume(Resource::Water, ctx),
            ZoneTag::Food => self.consume(Resource::Food, ctx),
            ZoneTag::Generator => self.start_generator(ctx),
            ZoneTag::Bed => self.try_sleep(command.correlation_id, ctx),
            ZoneTag::Card => ActionOutcome::Rejected(DomainError::Validation(
                "card pickups are handled by the door registry".to_owned(),
            )),
        };
        if let ActionOutcome::InFlight(handle) = outcome {
            self.gate_handle = Some(handle);
        }
        outcome
    }

    /// Applies the effects of a finished sequence.
    ///
    /// Returns `true` when `finished` was the sequence presenting the last
    /// gated action, meaning the interaction gate can accept input again.
    pub fn on_sequence_finished(
        &mut self,
        finished: &FinishedSequence,
        ctx: &mut CycleContext<'_>,
    ) -> bool {
        let releases_gate = self.gate_handle == Some(finished.handle);
        if releases_gate {
            self.gate_handle = None;
        }
        if let Some(routine) = self.special.as_mut() {
            if routine.chatter_handle == Some(finished.handle) {
                routine.chatter_handle = None;
            }
        }

        let Some(index) = self.pending.iter().position(|(h, _)| *h == finished.handle) else {
            return releases_gate;
        };
        let (_, pending) = self.pending.remove(index);
        match pending {
            Pending::Consume(resource) => self.finish_consumption(resource, finished.completed()),
            Pending::Sleep { correlation_id } if finished.completed() => {
                self.advance_day(correlation_id, ctx);
            }
            Pending::Sleep { .. } => {
                warn!(day = self.state.day, "sleep cancelled; day not advanced");
                self.phase = DayPhase::Awake;
                self.refresh_readiness();
            }
            Pending::Closing => self.load_next_scene(finished, ctx),
        }
        releases_gate
    }

    /// Advances the special-day timer and its chatter by `dt` seconds.
    pub fn tick(&mut self, dt: f32, ctx: &mut CycleContext<'_>) {
        let Some(config) = self.content.special_day.as_ref() else {
            return;
        };
        let Some(routine) = self.special.as_mut() else {
            return;
        };
        if routine.fired {
            return;
        }

        routine.elapsed += dt.max(0.0);
        if routine.elapsed < config.awake_duration {
            if !routine.chatter.tick(dt, ctx.rng) {
                return;
            }
            if routine.chatter_handle.is_some() {
                debug!("chatter skipped; previous line still playing");
            } else if let Some(line) = routine.chatter.next_line(ctx.rng) {
                let seq = Sequence::new("chatter").line(line);
                routine.chatter_handle = Some(ctx.scheduler.run_sequentially(seq, ctx.stage));
            }
            return;
        }

        routine.fired = true;
        if let Some(handle) = routine.chatter_handle.take() {
            if let Err(err) = ctx.scheduler.cancel(handle, ctx.stage) {
                debug!(error = %err, "chatter already finished");
            }
        }
        self.state.sleep_ready = true;
        self.phase = DayPhase::CutsceneOverride;
        info!(
            day = self.state.day,
            elapsed = routine.elapsed,
            "awake time over; playing closing"
        );

        let handle = match ctx.scheduler.run_override(config.closing.clone(), ctx.stage) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "closing falls back to the main track");
                ctx.scheduler
                    .run_sequentially(config.closing.clone().locking(), ctx.stage)
            }
        };
        self.pending.push((handle, Pending::Closing));
    }

    /// Current day state.
    #[must_use]
    pub const fn state(&self) -> &DayState {
        &self.state
    }

    /// Current day.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.state.day
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DayPhase {
        self.phase
    }

    /// Loaded content.
    #[must_use]
    pub const fn content(&self) -> &DayCycleContent {
        &self.content
    }

    /// Seconds spent awake on the special day, if its routine is running.
    #[must_use]
    pub fn special_elapsed(&self) -> Option<f32> {
        self.special.as_ref().map(|r| r.elapsed)
    }

    /// Scene loaded at the end of the special day, once it has happened.
    #[must_use]
    pub fn scene_loaded(&self) -> Option<&str> {
        self.scene_loaded.as_deref()
    }

    /// Number of day-advanced events published so far.
    #[must_use]
    pub const fn events_published(&self) -> i64 {
        self.events_published
    }

    fn consume(&mut self, resource: Resource, ctx: &mut CycleContext<'_>) -> ActionOutcome {
        let day = self.state.day;
        if self.state.has_consumed(resource) {
            debug!(%resource, day, "already consumed today");
            let script = self.content.repeat_dialogue(resource, day);
            return play_dialogue(format!("{resource}_repeat_day_{day}"), script, ctx);
        }
        let handle = ctx
            .scheduler
            .run_sequentially(self.content.consumption_sequence(resource), ctx.stage);
        self.begin_consumption(resource, handle)
    }

    fn start_generator(&mut self, ctx: &mut CycleContext<'_>) -> ActionOutcome {
        if self.state.has_consumed(Resource::Generator) {
            debug!(day = self.state.day, "generator already on");
            return ActionOutcome::Completed;
        }
        let handle = ctx
            .scheduler
            .run_sequentially(self.content.generator_sequence(), ctx.stage);
        // The ambient loop is dispatched on start and survives cancellation.
        if self.content.audio.generator_ambient.is_some() {
            self.state.consume(Resource::Generator, 0.0);
            info!(day = self.state.day, "generator on");
        }
        self.begin_consumption(Resource::Generator, handle)
    }

    fn begin_consumption(&mut self, resource: Resource, handle: SequenceHandle) -> ActionOutcome {
        self.phase = DayPhase::ConsumingResource(resource);
        self.pending.push((handle, Pending::Consume(resource)));
        ActionOutcome::InFlight(handle)
    }

    fn finish_consumption(&mut self, resource: Resource, completed: bool) {
        if completed {
            if self.state.consume(resource, self.content.consumption_amount) {
                info!(
                    %resource,
                    day = self.state.day,
                    hunger = self.state.hunger,
                    thirst = self.state.thirst,
                    "resource consumed"
                );
            }
        } else if self.state.has_consumed(resource) {
            warn!(%resource, "sequence cancelled; resource already committed");
        } else {
            warn!(%resource, "consumption cancelled; nothing recorded");
        }
        if self.phase == DayPhase::ConsumingResource(resource) {
            self.phase = DayPhase::Awake;
        }
        self.refresh_readiness();
    }

    fn try_sleep(&mut self, correlation_id: Uuid, ctx: &mut CycleContext<'_>) -> ActionOutcome {
        let day = self.state.day;
        let ready = if self.content.is_special_day(day) {
            self.state.sleep_ready
        } else {
            self.content.readiness.is_satisfied(&self.state)
        };
        if !ready {
            let missing = self.content.readiness.missing(&self.state);
            info!(day, ?missing, "not ready to sleep");
            return play_dialogue(
                "not_ready".to_owned(),
                Ok(&self.content.not_ready_dialogue),
                ctx,
            );
        }

        self.state.sleep_ready = true;
        let handle = ctx
            .scheduler
            .run_sequentially(self.content.sleep_sequence(day), ctx.stage);
        self.phase = DayPhase::Sleeping;
        self.pending.push((handle, Pending::Sleep { correlation_id }));
        info!(day, %handle, "going to sleep");
        ActionOutcome::InFlight(handle)
    }

    fn advance_day(&mut self, correlation_id: Uuid, ctx: &mut CycleContext<'_>) {
        let previous = self.state.day;
        let day = self.state.advance_day();
        self.events_published += 1;
        let event = DayAdvanced::new(
            self.id,
            self.events_published,
            correlation_id,
            &self.state,
            ctx.clock,
        );
        info!(
            cycle_id = %self.id,
            correlation_id = %correlation_id,
            from = previous,
            day,
            "day advanced"
        );
        self.bus.publish(&event);

        self.phase = DayPhase::Awake;
        self.play_wake_dialogue(ctx);
        if let Some(seq) = self.content.day_objects_sequence(day) {
            ctx.scheduler.run_sequentially(seq, ctx.stage);
        }
        self.refresh_readiness();
        if self.content.is_special_day(day) {
            self.start_special_routine(ctx);
        }
    }

    fn play_wake_dialogue(&self, ctx: &mut CycleContext<'_>) {
        let day = self.state.day;
        match self.content.wake_dialogue(day) {
            Ok(script) if script.is_empty() => debug!(day, "no wake-up dialogue"),
            Ok(script) => {
                ctx.scheduler
                    .run_sequentially(script.to_sequence(format!("wake_day_{day}")), ctx.stage);
            }
            Err(err) => warn!(day, error = %err, "skipping wake-up dialogue"),
        }
    }

    fn refresh_readiness(&mut self) {
        if matches!(
            self.phase,
            DayPhase::CutsceneOverride | DayPhase::Sleeping | DayPhase::ConsumingResource(_)
        ) {
            return;
        }
        if self.content.is_special_day(self.state.day) {
            self.phase = DayPhase::Awake;
            return;
        }
        self.state.sleep_ready = self.content.readiness.is_satisfied(&self.state);
        self.phase = if self.state.sleep_ready {
            DayPhase::SleepPending
        } else {
            DayPhase::Awake
        };
    }

    fn start_special_routine(&mut self, ctx: &mut CycleContext<'_>) {
        let Some(config) = &self.content.special_day else {
            return;
        };
        if self.special.is_some() {
            return;
        }
        info!(
            day = config.day,
            awake_duration = config.awake_duration,
            "special day routine started"
        );
        self.special = Some(SpecialRoutine {
            elapsed: 0.0,
            chatter: Chatter::new(config.chatter.clone(), ctx.rng),
            chatter_handle: None,
            fired: false,
        });
    }

    fn load_next_scene(&mut self, finished: &FinishedSequence, ctx: &mut CycleContext<'_>) {
        let Some(config) = &self.content.special_day else {
            return;
        };
        if self.scene_loaded.is_some() {
            debug!("next scene already loaded");
            return;
        }
        if !finished.completed() {
            warn!(handle = %finished.handle, "closing cancelled; loading next scene anyway");
        }
        info!(scene = %config.next_scene, "loading next scene");
        ctx.stage.world.load_scene(&config.next_scene);
        self.scene_loaded = Some(config.next_scene.clone());
    }
}

fn play_dialogue(
    name: String,
    script: Result<&DialogueScript, DomainError>,
    ctx: &mut CycleContext<'_>,
) -> ActionOutcome {
    match script.and_then(|s| dialogue_sequence(name, s)) {
        Ok(seq) => ActionOutcome::InFlight(ctx.scheduler.run_sequentially(seq, ctx.stage)),
        Err(err) => {
            warn!(error = %err, "skipping dialogue");
            ActionOutcome::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use daybreak_core::assets::{AudioClipRef, DialogueLine};
    use daybreak_test_support::{FixedClock, MockRng, RecordingStage, StageCall, StageLog};

    use super::*;
    use crate::domain::chatter::ChatterConfig;
    use crate::domain::content::{AudioCues, SpecialDay};

    const DT: f32 = 0.25;

    fn lines(prefix: &str, days: u32) -> Vec<DialogueScript> {
        (1..=days)
            .map(|d| DialogueScript::from_lines(vec![DialogueLine::new(format!("{prefix} {d}"), 2.0)]))
            .collect()
    }

    fn content() -> DayCycleContent {
        DayCycleContent {
            audio: AudioCues {
                water: Some(AudioClipRef::new("gulp")),
                food: Some(AudioClipRef::new("crunch")),
                generator_ambient: Some(AudioClipRef::new("hum")),
            },
            water_repeat_dialogues: lines("Already drank", 4),
            food_repeat_dialogues: lines("Already ate", 4),
            sleep_dialogues: lines("Dreaming", 4),
            wake_dialogues: lines("Morning", 4),
            not_ready_dialogue: DialogueScript::from_lines(vec![DialogueLine::new(
                "Not tired yet.",
                2.0,
            )]),
            generator_dialogue: DialogueScript::from_lines(vec![DialogueLine::new(
                "Power is back.",
                2.0,
            )]),
            special_day: Some(SpecialDay {
                day: 4,
                awake_duration: 10.0,
                chatter: ChatterConfig {
                    min_interval: 3.0,
                    max_interval: 3.0,
                    lines: vec![DialogueLine::new("Hm.", 1.0), DialogueLine::new("So quiet.", 1.0)],
                },
                closing: Sequence::new("closing")
                    .fade(Overlay::Scene, 1.0, 1.0)
                    .line(DialogueLine::new("The end.", 2.0)),
                next_scene: "Ending".to_owned(),
            }),
            ..DayCycleContent::default()
        }
    }

    struct Harness {
        cycle: DayCycle,
        scheduler: SequenceScheduler,
        stage: Stage,
        log: StageLog,
        clock: FixedClock,
        rng: MockRng,
        released: usize,
    }

    impl Harness {
        fn on_day(state: DayState) -> Self {
            Self::with_content(content(), state)
        }

        fn with_content(content: DayCycleContent, state: DayState) -> Self {
            let (stage, log) = RecordingStage::new().build();
            let mut harness = Self {
                cycle: DayCycle::with_state(content, state),
                scheduler: SequenceScheduler::new(),
                stage,
                log,
                clock: FixedClock::standard(),
                rng: MockRng,
                released: 0,
            };
            let mut ctx = CycleContext {
                scheduler: &mut harness.scheduler,
                stage: &mut harness.stage,
                clock: &harness.clock,
                rng: &mut harness.rng,
            };
            harness.cycle.begin(&mut ctx);
            harness
        }

        fn new() -> Self {
            Self::on_day(DayState::default())
        }

        fn act(&mut self, tag: ZoneTag) -> ActionOutcome {
            let mut ctx = CycleContext {
                scheduler: &mut self.scheduler,
                stage: &mut self.stage,
                clock: &self.clock,
                rng: &mut self.rng,
            };
            self.cycle
                .handle_action(&RequestGatedAction::new(tag), &mut ctx)
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn run(&mut self, seconds: f32) {
            for _ in 0..(seconds / DT) as usize {
                let finished = self.scheduler.tick(DT, &mut self.stage);
                let mut ctx = CycleContext {
                    scheduler: &mut self.scheduler,
                    stage: &mut self.stage,
                    clock: &self.clock,
                    rng: &mut self.rng,
                };
                for report in &finished {
                    if self.cycle.on_sequence_finished(report, &mut ctx) {
                        self.released += 1;
                    }
                }
                self.cycle.tick(DT, &mut ctx);
            }
        }

        fn shown(&self, text: &str) -> usize {
            self.log
                .count(|c| matches!(c, StageCall::ShowLine(t) if t == text))
        }
    }

    #[test]
    fn test_begin_fades_in_and_plays_first_wake_dialogue() {
        // Arrange
        let mut h = Harness::new();

        // Act
        h.run(2.0);

        // Assert
        assert_eq!(h.log.calls()[0], StageCall::Overlay(Overlay::Scene, 1.0));
        assert_eq!(h.log.last_alpha(Overlay::Scene), Some(0.0));
        assert_eq!(h.shown("Morning 1"), 1);
        assert_eq!(h.cycle.phase(), DayPhase::Awake);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_water_is_committed_when_its_sequence_completes() {
        // Arrange
        let mut h = Harness::new();

        // Act
        let outcome = h.act(ZoneTag::Water);
        let during = h.cycle.state().thirst;
        let phase_during = h.cycle.phase();
        h.run(2.5);

        // Assert
        assert!(outcome.holds_gate());
        assert_eq!(during, 0.0);
        assert_eq!(phase_during, DayPhase::ConsumingResource(Resource::Water));
        assert_eq!(h.cycle.state().thirst, 5.0);
        assert!(h.cycle.state().has_consumed(Resource::Water));
        assert_eq!(h.cycle.phase(), DayPhase::Awake);
        assert_eq!(h.released, 1);
        assert!(h.stage.lock.is_movement_enabled());
        assert!(h.log.contains(&StageCall::Audio {
            clip: "gulp".into(),
            looping: false
        }));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_second_water_plays_repeat_dialogue_instead() {
        // Arrange
        let mut h = Harness::new();
        h.act(ZoneTag::Water);
        h.run(2.5);

        // Act
        let outcome = h.act(ZoneTag::Water);
        let phase = h.cycle.phase();
        h.run(2.5);

        // Assert
        assert!(outcome.holds_gate());
        assert_eq!(phase, DayPhase::Awake);
        assert_eq!(h.cycle.state().thirst, 5.0);
        assert_eq!(h.shown("Already drank 1"), 1);
        assert_eq!(
            h.log.count(|c| matches!(c, StageCall::Audio { clip, .. } if clip == "gulp")),
            1
        );
        assert_eq!(h.released, 2);
    }

    #[test]
    fn test_generator_is_idempotent_for_the_day() {
        // Arrange
        let mut h = Harness::new();
        h.act(ZoneTag::Generator);
        h.run(2.0);

        // Act
        let again = h.act(ZoneTag::Generator);

        // Assert
        assert_eq!(again, ActionOutcome::Completed);
        assert!(h.cycle.state().has_consumed(Resource::Generator));
        let hum = StageCall::Audio {
            clip: "hum".into(),
            looping: true,
        };
        assert_eq!(h.log.count(|c| *c == hum), 1);
        assert_eq!(h.shown("Power is back."), 1);
    }

    #[test]
    fn test_bed_without_resources_plays_not_ready() {
        let mut h = Harness::new();

        let outcome = h.act(ZoneTag::Bed);
        h.run(2.0);

        assert!(outcome.holds_gate());
        assert_eq!(h.shown("Not tired yet."), 1);
        assert_eq!(h.cycle.day(), 1);
        assert_eq!(h.cycle.phase(), DayPhase::Awake);
    }

    #[test]
    fn test_day_two_requires_generator_to_sleep() {
        // Arrange
        let mut h = Harness::on_day(DayState::on_day(2));
        h.act(ZoneTag::Water);
        h.run(2.5);
        h.act(ZoneTag::Food);
        h.run(2.5);

        // Act
        let phase_before_generator = h.cycle.phase();
        h.act(ZoneTag::Bed);
        h.run(2.0);
        let day_after_refusal = h.cycle.day();
        h.act(ZoneTag::Generator);
        h.run(2.0);
        let phase_after_generator = h.cycle.phase();
        h.act(ZoneTag::Bed);
        h.run(12.0);

        // Assert
        assert_eq!(phase_before_generator, DayPhase::Awake);
        assert_eq!(day_after_refusal, 2);
        assert_eq!(h.shown("Not tired yet."), 1);
        assert_eq!(phase_after_generator, DayPhase::SleepPending);
        assert_eq!(h.cycle.day(), 3);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_full_day_publishes_day_advanced_with_reset_values() {
        // Arrange
        let mut h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        h.cycle
            .subscribe(move |e: &DayAdvanced| sink.borrow_mut().push((e.day, e.hunger, e.thirst)));
        h.act(ZoneTag::Water);
        h.run(2.5);
        h.act(ZoneTag::Food);
        h.run(2.5);
        let (hunger, thirst) = (h.cycle.state().hunger, h.cycle.state().thirst);

        // Act
        let outcome = h.act(ZoneTag::Bed);
        let phase = h.cycle.phase();
        h.run(12.0);

        // Assert
        assert_eq!((hunger, thirst), (5.0, 5.0));
        assert!(outcome.holds_gate());
        assert_eq!(phase, DayPhase::Sleeping);
        assert_eq!(*seen.borrow(), vec![(2, 0.0, 0.0)]);
        let state = h.cycle.state();
        assert_eq!(state.day, 2);
        assert_eq!(state.hunger, 0.0);
        assert_eq!(state.thirst, 0.0);
        assert!(state.resources.is_empty());
        assert!(!state.sleep_ready);
        assert_eq!(h.cycle.events_published(), 1);
        assert_eq!(h.shown("Dreaming 1"), 1);
        assert_eq!(h.stage.lock.outstanding(), 0);
    }

    #[test]
    fn test_wake_dialogue_follows_the_new_day() {
        let mut h = Harness::new();
        h.act(ZoneTag::Water);
        h.run(2.5);
        h.act(ZoneTag::Food);
        h.run(2.5);

        h.act(ZoneTag::Bed);
        h.run(14.0);

        assert_eq!(h.shown("Morning 2"), 1);
        assert!(h.stage.lock.is_movement_enabled());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_cancelled_consumption_commits_nothing() {
        // Arrange
        let mut h = Harness::new();
        let ActionOutcome::InFlight(handle) = h.act(ZoneTag::Food) else {
            panic!("expected a consumption sequence");
        };
        h.run(1.0);

        // Act
        h.scheduler.cancel(handle, &mut h.stage).unwrap();
        h.run(DT);

        // Assert
        assert_eq!(h.cycle.state().hunger, 0.0);
        assert!(!h.cycle.state().has_consumed(Resource::Food));
        assert_eq!(h.cycle.phase(), DayPhase::Awake);
        assert_eq!(h.stage.lock.outstanding(), 0);
        assert_eq!(h.released, 1);
    }

    #[test]
    fn test_cancelled_sleep_keeps_the_day() {
        // Arrange
        let mut h = Harness::new();
        h.act(ZoneTag::Water);
        h.run(2.5);
        h.act(ZoneTag::Food);
        h.run(2.5);
        let ActionOutcome::InFlight(handle) = h.act(ZoneTag::Bed) else {
            panic!("expected the sleep sequence");
        };
        h.run(3.0);

        // Act
        h.scheduler.cancel(handle, &mut h.stage).unwrap();
        h.run(DT);

        // Assert
        assert_eq!(h.cycle.day(), 1);
        assert_eq!(h.cycle.events_published(), 0);
        assert_eq!(h.cycle.phase(), DayPhase::SleepPending);
        assert!(h.stage.lock.is_movement_enabled());
    }

    #[test]
    fn test_cancelled_generator_keeps_its_single_hum() {
        // Arrange
        let mut h = Harness::new();
        let ActionOutcome::InFlight(handle) = h.act(ZoneTag::Generator) else {
            panic!("expected the generator sequence");
        };
        h.scheduler.cancel(handle, &mut h.stage).unwrap();
        h.run(1.0);

        // Act
        let again = h.act(ZoneTag::Generator);

        // Assert
        assert_eq!(again, ActionOutcome::Completed);
        assert!(h.cycle.state().has_consumed(Resource::Generator));
        assert_eq!(
            h.log.count(|c| matches!(c, StageCall::Audio { clip, looping: true } if clip == "hum")),
            1
        );
        assert_eq!(h.cycle.phase(), DayPhase::Awake);
    }

    #[test]
    fn test_card_is_not_a_day_cycle_action() {
        let mut h = Harness::new();

        let outcome = h.act(ZoneTag::Card);

        assert!(matches!(outcome, ActionOutcome::Rejected(DomainError::Validation(_))));
    }

    #[test]
    fn test_special_day_closing_fires_exactly_once() {
        // Arrange
        let mut h = Harness::on_day(DayState::on_day(4));

        // Act
        h.run(9.0);
        let ready_before = h.cycle.state().sleep_ready;
        h.run(1.0);
        let phase_at_timeout = h.cycle.phase();
        h.run(20.0);

        // Assert
        assert!(!ready_before);
        assert_eq!(phase_at_timeout, DayPhase::CutsceneOverride);
        assert!(h.cycle.state().sleep_ready);
        assert_eq!(h.shown("The end."), 1);
        assert_eq!(h.log.scene_loads(), vec!["Ending".to_owned()]);
        assert_eq!(h.cycle.scene_loaded(), Some("Ending"));
        assert_eq!(h.stage.lock.outstanding(), 0);
    }

    #[test]
    fn test_special_day_chatter_alternates_lines() {
        let mut h = Harness::on_day(DayState::on_day(4));

        h.run(9.5);

        let spoken: Vec<String> = h
            .log
            .lines()
            .into_iter()
            .filter(|t| t == "Hm." || t == "So quiet.")
            .collect();
        assert_eq!(spoken, vec!["Hm.", "So quiet.", "Hm."]);
    }

    #[test]
    fn test_chatter_skipped_while_speaking_does_not_count_as_previous_line() {
        // Arrange: lines outlast the one-second interval.
        let mut content = content();
        if let Some(special) = content.special_day.as_mut() {
            special.chatter = ChatterConfig {
                min_interval: 1.0,
                max_interval: 1.0,
                lines: vec![DialogueLine::new("Hm.", 1.5), DialogueLine::new("So quiet.", 1.5)],
            };
        }
        let mut h = Harness::with_content(content, DayState::on_day(4));

        // Act
        h.run(3.5);

        // Assert
        let spoken: Vec<String> = h
            .log
            .lines()
            .into_iter()
            .filter(|t| t == "Hm." || t == "So quiet.")
            .collect();
        assert_eq!(spoken, vec!["Hm.", "So quiet."]);
    }

    #[test]
    fn test_special_day_bed_before_timer_is_refused() {
        // Arrange
        let mut h = Harness::on_day(DayState::on_day(4));
        h.act(ZoneTag::Water);
        h.run(2.5);
        h.act(ZoneTag::Food);
        h.run(2.5);

        // Act
        let outcome = h.act(ZoneTag::Bed);
        h.run(2.0);

        // Assert
        assert!(outcome.holds_gate());
        assert_eq!(h.shown("Not tired yet."), 1);
        assert_eq!(h.cycle.day(), 4);
    }

    #[test]
    fn test_actions_are_rejected_after_closing() {
        let mut h = Harness::on_day(DayState::on_day(4));
        h.run(10.0);

        let outcome = h.act(ZoneTag::Water);

        assert!(matches!(outcome, ActionOutcome::Rejected(_)));
    }
}
