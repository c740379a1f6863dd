//! Scripted playback: the host loop the binary runs.

use std::time::Duration;

use daybreak_day_cycle::application::query_handlers::DayCycleView;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::director::Director;
use crate::script::Script;

/// Why playback stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every input was fed and nothing is left running.
    ScriptFinished,
    /// The special day ended in a scene change.
    SceneLoaded,
    /// The simulated-time cap was reached.
    TimeCap,
}

/// End-of-run report.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSummary {
    /// Why playback stopped.
    pub stop: StopReason,
    /// Simulated seconds played.
    pub elapsed: f32,
    /// Host ticks run.
    pub ticks: u64,
    /// Script inputs fed to the director.
    pub inputs: usize,
    /// Session state at the end.
    pub view: DayCycleView,
}

/// Plays `script` through `director` at the tick rate in `settings`.
///
/// With `settings.realtime` each tick waits on a `tokio` interval;
/// otherwise ticks run back to back.
pub async fn play(director: &mut Director, script: &Script, settings: &Settings) -> PlaybackSummary {
    let dt = settings.dt();
    let mut cursor = script.cursor();
    let mut pacing = settings
        .realtime
        .then(|| tokio::time::interval(Duration::from_secs_f32(dt)));
    let mut now = 0.0_f32;
    let mut ticks = 0_u64;
    let mut inputs = 0_usize;

    director.begin();
    info!(
        entries = cursor.remaining(),
        dt,
        realtime = settings.realtime,
        "playback started"
    );

    let stop = loop {
        for input in cursor.due(now) {
            debug!(at = now, ?input, "script input");
            director.apply(&input);
            inputs += 1;
        }
        if director.scene_loaded().is_some() {
            break StopReason::SceneLoaded;
        }
        if cursor.is_exhausted() && director.is_idle() {
            break StopReason::ScriptFinished;
        }
        if now >= settings.max_seconds {
            break StopReason::TimeCap;
        }
        if let Some(interval) = pacing.as_mut() {
            interval.tick().await;
        }
        director.tick(dt);
        ticks += 1;
        now += dt;
    };

    info!(?stop, elapsed = now, ticks, "playback stopped");
    PlaybackSummary {
        stop,
        elapsed: now,
        ticks,
        inputs,
        view: director.view(),
    }
}
