//! Daybreak: Sequence Scheduling bounded context.
//!
//! Sequences are immutable lists of timed steps (fade, wait, dialogue line,
//! teleport, object toggle, audio). The scheduler owns all progress state and
//! advances it on simulated time handed in by the host loop.

pub mod application;
pub mod domain;
