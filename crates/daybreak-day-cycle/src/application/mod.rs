//! Application layer for the Day Cycle context.

pub mod command_handlers;
pub mod query_handlers;
