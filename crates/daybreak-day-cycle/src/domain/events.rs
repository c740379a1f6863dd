//! The day-advanced event and its bus.

use std::fmt;

use daybreak_core::clock::Clock;
use daybreak_core::event::{DomainEvent, EventMetadata};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::state::DayState;

const DAY_ADVANCED: &str = "day_cycle.day_advanced";

/// Emitted exactly once per day increment, after the per-day reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAdvanced {
    /// Event metadata.
    #[serde(skip)]
    pub metadata: EventMetadata,
    /// The new day.
    pub day: u32,
    /// Hunger after the reset.
    pub hunger: f32,
    /// Thirst after the reset.
    pub thirst: f32,
}

impl DayAdvanced {
    /// Builds the event for `state`, which must already be on the new day.
    #[must_use]
    pub fn new(
        cycle_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        state: &DayState,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            metadata: EventMetadata::direct(
                DAY_ADVANCED,
                cycle_id,
                sequence_number,
                correlation_id,
                clock.now(),
            ),
            day: state.day,
            hunger: state.hunger,
            thirst: state.thirst,
        }
    }
}

impl DomainEvent for DayAdvanced {
    fn event_type(&self) -> &'static str {
        DAY_ADVANCED
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "day": self.day,
            "hunger": self.hunger,
            "thirst": self.thirst,
        })
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

/// Something that reacts to a new day.
pub trait DayAdvancedSubscriber {
    /// Called synchronously at the point of day increment.
    fn on_day_advanced(&mut self, event: &DayAdvanced);
}

impl<F> DayAdvancedSubscriber for F
where
    F: FnMut(&DayAdvanced),
{
    fn on_day_advanced(&mut self, event: &DayAdvanced) {
        self(event);
    }
}

/// Observer list for `DayAdvanced`. Delivery order is registration order.
#[derive(Default)]
pub struct DayEventBus {
    subscribers: Vec<Box<dyn DayAdvancedSubscriber>>,
}

impl DayEventBus {
    /// An empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `subscriber` after every existing one.
    pub fn subscribe(&mut self, subscriber: impl DayAdvancedSubscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Delivers `event` to every subscriber. Returns how many were called.
    pub fn publish(&mut self, event: &DayAdvanced) -> usize {
        for subscriber in &mut self.subscribers {
            subscriber.on_day_advanced(event);
        }
        debug!(
            day = event.day,
            subscribers = self.subscribers.len(),
            "day advanced delivered"
        );
        self.subscribers.len()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for DayEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayEventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
