//! Daybreak Runtime: wires the core into a play session.
//!
//! `Director` owns one session; `session::play` drives it from a timed
//! input script. The binary in `main.rs` adds configuration and logging.

pub mod config;
pub mod content;
pub mod director;
pub mod error;
pub mod presenters;
pub mod script;
pub mod session;
