//! Shared test doubles and utilities for the Daybreak narrative core.

mod clock;
mod rng;
mod stage;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use stage::{RecordingStage, StageCall, StageLog};
