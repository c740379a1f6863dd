//! Daybreak Core: shared abstractions for the narrative-progression core.
//!
//! This crate defines the types every bounded context depends on: the
//! reference-counted control lock, the collaborator ports the core talks to,
//! and the error taxonomy. It contains no engine code.

pub mod assets;
pub mod clock;
pub mod command;
pub mod control_lock;
pub mod error;
pub mod event;
pub mod ports;
pub mod rng;
