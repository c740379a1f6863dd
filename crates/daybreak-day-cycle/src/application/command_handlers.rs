//! Command handlers for the Day Cycle context.
//!
//! These sit between the interaction gate, the door volumes and the
//! domain: route the request, run whatever sequence the domain decides on,
//! and log the outcome.

use daybreak_core::ports::Stage;
use daybreak_interaction::domain::commands::RequestGatedAction;
use daybreak_interaction::domain::zone::ZoneTag;
use daybreak_sequence::application::scheduler::{
    FinishedSequence, SequenceHandle, SequenceScheduler,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::aggregates::{ActionOutcome, CycleContext, DayCycle};
use crate::domain::doors::{DoorDecision, DoorRegistry};

/// Handles a gated action: keycard pickups go to the door registry,
/// everything else to the day cycle.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, tag = %command.tag, day = cycle.day())
)]
pub fn handle_gated_action(
    command: &RequestGatedAction,
    cycle: &mut DayCycle,
    doors: &mut DoorRegistry,
    ctx: &mut CycleContext<'_>,
) -> ActionOutcome {
    if command.tag == ZoneTag::Card {
        return pick_up_card(doors, ctx.stage);
    }
    let outcome = cycle.handle_action(command, ctx);
    match &outcome {
        ActionOutcome::InFlight(handle) => info!(%handle, "gated action in flight"),
        ActionOutcome::Completed => debug!("gated action completed immediately"),
        ActionOutcome::Rejected(err) => warn!(error = %err, "gated action rejected"),
    }
    outcome
}

fn pick_up_card(doors: &mut DoorRegistry, stage: &mut Stage) -> ActionOutcome {
    if doors.has_card() {
        debug!("keycard already held");
        return ActionOutcome::Completed;
    }
    doors.set_card(true);
    if let Some(pickup) = doors.card_pickup() {
        if let Err(err) = stage.world.set_active(pickup, false) {
            warn!(error = %err, "could not hide keycard pickup");
        }
    }
    info!("keycard picked up");
    ActionOutcome::Completed
}

/// Routes a finished sequence to the doors and the day cycle.
///
/// Returns `true` when the interaction gate may accept input again.
pub fn handle_sequence_finished(
    finished: &FinishedSequence,
    cycle: &mut DayCycle,
    doors: &mut DoorRegistry,
    ctx: &mut CycleContext<'_>,
) -> bool {
    if doors.on_sequence_finished(finished.handle) {
        debug!(handle = %finished.handle, "door sequence finished");
    }
    cycle.on_sequence_finished(finished, ctx)
}

/// The player entered door volume `door_id` on `day`.
///
/// Returns the handle of the sequence started on the door's behalf, if any.
#[instrument(skip(doors, scheduler, stage))]
pub fn handle_door_enter(
    door_id: &str,
    day: u32,
    doors: &mut DoorRegistry,
    scheduler: &mut SequenceScheduler,
    stage: &mut Stage,
) -> Option<SequenceHandle> {
    match doors.on_enter(door_id, day) {
        DoorDecision::Unknown => {
            warn!("unknown door");
            None
        }
        DoorDecision::NotYet | DoorDecision::Busy | DoorDecision::AlreadyOpen => None,
        DoorDecision::NeedsCard(seq) if seq.is_empty() => {
            debug!("card needed; no card dialogue configured");
            None
        }
        DoorDecision::NeedsCard(seq) | DoorDecision::Teleport(seq) => {
            let handle = scheduler.run_sequentially(seq, stage);
            doors.track(door_id, handle);
            Some(handle)
        }
        DoorDecision::Open(object) => {
            if let Err(err) = stage.world.set_door_open(&object, true) {
                warn!(error = %err, "could not open door");
            }
            None
        }
    }
}

/// The player left door volume `door_id`; sliding doors close behind them.
#[instrument(skip(doors, stage))]
pub fn handle_door_exit(door_id: &str, doors: &mut DoorRegistry, stage: &mut Stage) {
    if let Some(object) = doors.on_exit(door_id) {
        if let Err(err) = stage.world.set_door_open(&object, false) {
            warn!(error = %err, "could not close door");
        }
    }
}
