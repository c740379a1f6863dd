//! Domain layer for the Interaction context.

pub mod commands;
pub mod zone;
