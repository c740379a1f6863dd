//! Daybreak playback entry point.

use std::error::Error;

use daybreak_core::clock::SystemClock;
use daybreak_core::rng::SeededRng;
use daybreak_runtime::config::Settings;
use daybreak_runtime::content::GameContent;
use daybreak_runtime::director::Director;
use daybreak_runtime::presenters::tracing_stage;
use daybreak_runtime::script::Script;
use daybreak_runtime::session;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;

    // Initialize tracing subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if settings.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(seed = settings.seed, tick_hz = settings.tick_hz, "Starting Daybreak");

    let content = GameContent::load(settings.content_path.as_deref())?;
    let script = Script::load(settings.script_path.as_deref())?;

    let mut director = Director::new(
        content,
        tracing_stage(),
        Box::new(SystemClock),
        Box::new(SeededRng::new(settings.seed)),
    );

    let summary = session::play(&mut director, &script, &settings).await;
    let report = director.shutdown();
    tracing::info!(
        cancelled = report.cancelled,
        released = report.released,
        "session closed"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
