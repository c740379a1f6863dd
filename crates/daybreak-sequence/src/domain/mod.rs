//! Domain model for the Sequence Scheduling context.

pub mod cutscene;
pub mod fade;
pub mod steps;
