//! Application layer for the Interaction context.

pub mod gate;
