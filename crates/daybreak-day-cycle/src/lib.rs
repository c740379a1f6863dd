//! Daybreak: Day Cycle bounded context.
//!
//! Owns the day counter and the per-day resource flags, decides whether the
//! player may sleep, drives the sleep transition and publishes the
//! day-advanced event. Also holds the door rules that react to the day.

pub mod application;
pub mod domain;
