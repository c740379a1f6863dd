//! Session wiring: one `Director` owns every piece of a play session and
//! turns collaborator callbacks and host ticks into calls on the core.
//!
//! Per tick, completion reports from the scheduler are routed first, then
//! the day cycle advances its own timers.

use std::collections::HashSet;
use std::fmt;

use daybreak_core::clock::Clock;
use daybreak_core::control_lock::ControlLockToken;
use daybreak_core::error::DomainError;
use daybreak_core::ports::Stage;
use daybreak_core::rng::DeterministicRng;
use daybreak_day_cycle::application::command_handlers::{
    handle_door_enter, handle_door_exit, handle_gated_action, handle_sequence_finished,
};
use daybreak_day_cycle::application::query_handlers::{DayCycleView, get_day_cycle_view};
use daybreak_day_cycle::domain::aggregates::{ActionOutcome, CycleContext, DayCycle};
use daybreak_day_cycle::domain::doors::DoorRegistry;
use daybreak_day_cycle::domain::events::{DayAdvanced, DayAdvancedSubscriber};
use daybreak_day_cycle::domain::state::DayState;
use daybreak_interaction::application::gate::InteractionGate;
use daybreak_interaction::domain::zone::{InteractionZone, ZoneTag};
use daybreak_sequence::application::scheduler::{SequenceHandle, SequenceScheduler};
use daybreak_sequence::domain::cutscene::{TriggerPlan, TriggerScript};
use daybreak_sequence::domain::steps::Sequence;
use tracing::{debug, info, instrument, warn};

use crate::content::{GameContent, zone_for};
use crate::script::Input;

/// What `shutdown` cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Sequences that were still running.
    pub cancelled: usize,
    /// Control-lock tokens nobody had released.
    pub released: usize,
}

/// One play session.
pub struct Director {
    stage: Stage,
    scheduler: SequenceScheduler,
    gate: InteractionGate,
    cycle: DayCycle,
    doors: DoorRegistry,
    zones: Vec<InteractionZone>,
    triggers: Vec<TriggerScript>,
    fired_triggers: HashSet<String>,
    clock: Box<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    started: bool,
}

impl Director {
    /// A session on day 1.
    #[must_use]
    pub fn new(
        content: GameContent,
        stage: Stage,
        clock: Box<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
    ) -> Self {
        Self::with_state(content, DayState::default(), stage, clock, rng)
    }

    /// A session resuming from `state`.
    #[must_use]
    pub fn with_state(
        content: GameContent,
        state: DayState,
        stage: Stage,
        clock: Box<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
    ) -> Self {
        let GameContent {
            day_cycle,
            doors,
            triggers,
            zones,
        } = content;
        let mut cycle = DayCycle::with_state(day_cycle, state);
        let unlock_rules = DoorRegistry::new(doors.clone());
        cycle.subscribe(move |event: &DayAdvanced| {
            for door in unlock_rules.newly_unlocked(event.day) {
                info!(door = %door, day = event.day, "door unlocked");
            }
        });
        Self {
            stage,
            scheduler: SequenceScheduler::new(),
            gate: InteractionGate::new(),
            cycle,
            doors: DoorRegistry::new(doors),
            zones,
            triggers,
            fired_triggers: HashSet::new(),
            clock,
            rng,
            started: false,
        }
    }

    /// Opens the scene. Later calls do nothing.
    pub fn begin(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let Self {
            stage,
            scheduler,
            cycle,
            clock,
            rng,
            ..
        } = self;
        let mut ctx = CycleContext {
            scheduler,
            stage,
            clock: clock.as_ref(),
            rng: rng.as_mut(),
        };
        cycle.begin(&mut ctx);
    }

    /// Advances everything by `dt` simulated seconds.
    pub fn tick(&mut self, dt: f32) {
        let Self {
            stage,
            scheduler,
            gate,
            cycle,
            doors,
            clock,
            rng,
            ..
        } = self;
        let finished = scheduler.tick(dt, stage);
        let mut ctx = CycleContext {
            scheduler,
            stage,
            clock: clock.as_ref(),
            rng: rng.as_mut(),
        };
        for report in &finished {
            if handle_sequence_finished(report, cycle, doors, &mut ctx) {
                gate.complete_action();
            }
        }
        cycle.tick(dt, &mut ctx);
    }

    /// Feeds one scripted input to the matching entry point.
    pub fn apply(&mut self, input: &Input) {
        match input {
            Input::EnterZone { tag } => self.on_zone_enter(*tag),
            Input::ExitZone { tag } => self.on_zone_exit(*tag),
            Input::ActionKey => {
                self.on_action_key();
            }
            Input::EnterDoor { id } => {
                self.on_door_enter(id);
            }
            Input::ExitDoor { id } => self.on_door_exit(id),
            Input::EnterTrigger { id } => {
                self.on_trigger_enter(id);
            }
            Input::SetCard { has_card } => self.set_card_flag(*has_card),
        }
    }

    /// The player entered the zone tagged `tag`.
    #[instrument(skip(self))]
    pub fn on_zone_enter(&mut self, tag: ZoneTag) {
        let zone = zone_for(&self.zones, tag);
        self.gate.on_zone_enter(zone, self.stage.prompt.as_mut());
    }

    /// The player left the zone tagged `tag`.
    #[instrument(skip(self))]
    pub fn on_zone_exit(&mut self, tag: ZoneTag) {
        self.gate.on_zone_exit(tag, self.stage.prompt.as_mut());
    }

    /// The action key was pressed.
    ///
    /// Returns `None` when the press was dropped: no zone, an action in
    /// flight, or a cutscene on the override track.
    #[instrument(skip(self))]
    pub fn on_action_key(&mut self) -> Option<ActionOutcome> {
        if self.scheduler.is_override_active() {
            debug!("action key ignored during cutscene");
            return None;
        }
        let command = self.gate.on_action_key(self.stage.prompt.as_mut())?;
        let Self {
            stage,
            scheduler,
            gate,
            cycle,
            doors,
            clock,
            rng,
            ..
        } = self;
        let mut ctx = CycleContext {
            scheduler,
            stage,
            clock: clock.as_ref(),
            rng: rng.as_mut(),
        };
        let outcome = handle_gated_action(&command, cycle, doors, &mut ctx);
        if !outcome.holds_gate() {
            gate.complete_action();
        }
        Some(outcome)
    }

    /// The player entered door volume `id`.
    #[instrument(skip(self))]
    pub fn on_door_enter(&mut self, id: &str) -> Option<SequenceHandle> {
        handle_door_enter(
            id,
            self.cycle.day(),
            &mut self.doors,
            &mut self.scheduler,
            &mut self.stage,
        )
    }

    /// The player left door volume `id`.
    #[instrument(skip(self))]
    pub fn on_door_exit(&mut self, id: &str) {
        handle_door_exit(id, &mut self.doors, &mut self.stage);
    }

    /// The player entered trigger `id`. Each trigger plays at most once.
    #[instrument(skip(self))]
    pub fn on_trigger_enter(&mut self, id: &str) -> Option<SequenceHandle> {
        if self.fired_triggers.contains(id) {
            debug!("trigger already fired");
            return None;
        }
        let Some(trigger) = self.triggers.iter().find(|t| t.id == id) else {
            let err = DomainError::MissingReference(format!("trigger {id}"));
            warn!(error = %err, "unknown trigger");
            return None;
        };
        let handle = match trigger.plan() {
            TriggerPlan::Main(seq) if seq.is_empty() => {
                let err = DomainError::MissingReference(format!("dialogue for trigger {id}"));
                warn!(error = %err, "trigger has nothing to play");
                None
            }
            TriggerPlan::Main(seq) => Some(self.scheduler.run_sequentially(seq, &mut self.stage)),
            TriggerPlan::Override(seq) => match self.scheduler.run_override(seq, &mut self.stage) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!(error = %err, "cutscene not started; trigger stays armed");
                    return None;
                }
            },
        };
        self.fired_triggers.insert(id.to_owned());
        info!(handle = ?handle, "trigger fired");
        handle
    }

    /// Suppresses movement until the token is passed to `unlock_movement`.
    pub fn lock_movement(&mut self) -> ControlLockToken {
        self.stage.lock.acquire()
    }

    /// Releases a token from `lock_movement`. Returns `false` if it was not held.
    pub fn unlock_movement(&mut self, token: ControlLockToken) -> bool {
        self.stage.lock.release(token)
    }

    /// Runs `sequence` on the main track.
    pub fn run_sequence(&mut self, sequence: Sequence) -> SequenceHandle {
        self.scheduler.run_sequentially(sequence, &mut self.stage)
    }

    /// Cancels a running sequence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownSequence` if `handle` is not running.
    pub fn cancel_sequence(&mut self, handle: SequenceHandle) -> Result<(), DomainError> {
        self.scheduler.cancel(handle, &mut self.stage)
    }

    /// Registers a day-advanced subscriber after the built-in ones.
    pub fn subscribe_day_advanced(&mut self, subscriber: impl DayAdvancedSubscriber + 'static) {
        self.cycle.subscribe(subscriber);
    }

    /// Current day.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.cycle.day()
    }

    /// Grants or takes away the keycard.
    pub fn set_card_flag(&mut self, has_card: bool) {
        info!(has_card, "card flag set");
        self.doors.set_card(has_card);
    }

    /// Snapshot of the session.
    #[must_use]
    pub fn view(&self) -> DayCycleView {
        get_day_cycle_view(&self.cycle, &self.doors)
    }

    /// Whether nothing is running and nothing is waiting on a timer.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let waiting_for_closing =
            self.cycle.special_elapsed().is_some() && self.cycle.scene_loaded().is_none();
        self.scheduler.running_count() == 0 && !waiting_for_closing
    }

    /// Scene loaded at the end of the special day, if any.
    #[must_use]
    pub fn scene_loaded(&self) -> Option<&str> {
        self.cycle.scene_loaded()
    }

    /// Whether the player may move.
    #[must_use]
    pub fn is_movement_enabled(&self) -> bool {
        self.stage.lock.is_movement_enabled()
    }

    /// Control-lock tokens currently held.
    #[must_use]
    pub fn outstanding_locks(&self) -> usize {
        self.stage.lock.outstanding()
    }

    /// Whether a gated action is in flight.
    #[must_use]
    pub const fn is_action_in_flight(&self) -> bool {
        self.gate.is_busy()
    }

    /// Sequences currently running on either track.
    #[must_use]
    pub fn running_sequences(&self) -> usize {
        self.scheduler.running_count()
    }

    /// Ends the session: cancels every sequence and force-releases any
    /// control-lock token still held.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let cancelled = self.scheduler.cancel_all(&mut self.stage);
        let released = self.stage.lock.release_all();
        self.stage.dialogue.clear_line();
        self.stage.prompt.hide_prompt();
        info!(cancelled, released, day = self.cycle.day(), "session shut down");
        ShutdownReport {
            cancelled,
            released,
        }
    }
}

impl fmt::Debug for Director {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("day", &self.cycle.day())
            .field("phase", &self.cycle.phase())
            .field("scheduler", &self.scheduler)
            .field("gate", &self.gate)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
