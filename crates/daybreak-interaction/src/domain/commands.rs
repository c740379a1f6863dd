//! Commands for the Interaction context.

use daybreak_core::command::Command;
use uuid::Uuid;

use super::zone::ZoneTag;

/// Request to perform the action offered by the current zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestGatedAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Tag of the zone the key was pressed in.
    pub tag: ZoneTag,
}

impl RequestGatedAction {
    /// A request with a fresh correlation id.
    #[must_use]
    pub fn new(tag: ZoneTag) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            tag,
        }
    }
}

impl Command for RequestGatedAction {
    fn command_type(&self) -> &'static str {
        "interaction.request_gated_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
