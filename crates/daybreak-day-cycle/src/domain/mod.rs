//! Domain layer for the Day Cycle context.

pub mod aggregates;
pub mod chatter;
pub mod content;
pub mod doors;
pub mod events;
pub mod readiness;
pub mod state;
