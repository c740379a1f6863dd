//! Events raised by the narrative core.
//!
//! Events are delivered synchronously to in-process subscribers. The
//! metadata exists so a log line or a JSON dump can be traced back to the
//! player input that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope data carried by every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    /// Dotted name, e.g. `day_cycle.day_advanced`.
    pub event_type: String,
    /// The state machine instance that raised the event.
    pub aggregate_id: Uuid,
    /// Position of this event among those raised by `aggregate_id`, from 1.
    pub sequence_number: i64,
    /// The action request the event ultimately stems from.
    pub correlation_id: Uuid,
    /// The immediate cause. Equal to `correlation_id` when the action
    /// raised the event directly.
    pub causation_id: Uuid,
    /// Wall-clock time, taken from the injected clock.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Metadata for an event raised directly by the request `correlation_id`.
    #[must_use]
    pub fn direct(
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at,
        }
    }
}

/// An event that subscribers and loggers can inspect uniformly.
pub trait DomainEvent: std::fmt::Debug {
    fn event_type(&self) -> &'static str;

    /// The subscriber-facing fields, without metadata.
    fn to_payload(&self) -> serde_json::Value;

    fn metadata(&self) -> &EventMetadata;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_metadata_uses_request_as_cause() {
        // Arrange
        let cycle = Uuid::new_v4();
        let request = Uuid::new_v4();
        let at = DateTime::<Utc>::UNIX_EPOCH;

        // Act
        let meta = EventMetadata::direct("day_cycle.day_advanced", cycle, 2, request, at);

        // Assert
        assert_eq!(meta.event_type, "day_cycle.day_advanced");
        assert_eq!(meta.aggregate_id, cycle);
        assert_eq!(meta.sequence_number, 2);
        assert_eq!(meta.causation_id, request);
        assert_eq!(meta.occurred_at, at);
    }
}
