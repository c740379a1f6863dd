//! Query handlers for the Day Cycle context.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{DayCycle, DayPhase};
use crate::domain::doors::DoorRegistry;
use crate::domain::state::Resource;

/// Read-only view of the day cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCycleView {
    /// The cycle identifier.
    pub cycle_id: Uuid,
    /// Current day.
    pub day: u32,
    /// Hunger meter.
    pub hunger: f32,
    /// Thirst meter.
    pub thirst: f32,
    /// Resources consumed today.
    pub consumed: Vec<Resource>,
    /// Whether the bed will accept the player.
    pub sleep_ready: bool,
    /// Current phase.
    pub phase: DayPhase,
    /// Whether the keycard is held.
    pub has_card: bool,
    /// Seconds awake on the special day, while its routine runs.
    pub special_day_elapsed: Option<f32>,
    /// Scene loaded at the end of the special day.
    pub scene_loaded: Option<String>,
    /// Day-advanced events published so far.
    pub days_advanced: i64,
}

/// Builds the view of `cycle` and `doors`.
#[must_use]
pub fn get_day_cycle_view(cycle: &DayCycle, doors: &DoorRegistry) -> DayCycleView {
    let state = cycle.state();
    DayCycleView {
        cycle_id: cycle.id,
        day: state.day,
        hunger: state.hunger,
        thirst: state.thirst,
        consumed: state.resources.iter().collect(),
        sleep_ready: state.sleep_ready,
        phase: cycle.phase(),
        has_card: doors.has_card(),
        special_day_elapsed: cycle.special_elapsed(),
        scene_loaded: cycle.scene_loaded().map(str::to_owned),
        days_advanced: cycle.events_published(),
    }
}
