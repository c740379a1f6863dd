//! Requests entering the core from player input.

use uuid::Uuid;

/// A player-originated request, such as pressing the action key in a zone.
pub trait Command: std::fmt::Debug {
    /// Short dotted name used in log fields.
    fn command_type(&self) -> &'static str;

    /// Fresh per request; copied into every event the request causes.
    fn correlation_id(&self) -> Uuid;
}
