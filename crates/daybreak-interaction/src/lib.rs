//! Daybreak: Interaction bounded context.
//!
//! Turns "player entered a trigger volume" and "action key pressed" into
//! gated action requests, with one active zone and a single busy flag.

pub mod application;
pub mod domain;
