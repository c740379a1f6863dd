//! Application layer for the Sequence Scheduling context.

mod running;
pub mod scheduler;
