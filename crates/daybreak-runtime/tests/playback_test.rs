//! Scripted playback through `session::play`.

mod common;

use common::{Session, TEST_CONTENT};
use daybreak_core::rng::SeededRng;
use daybreak_day_cycle::domain::state::DayState;
use daybreak_runtime::config::{DEFAULT_SEED, Settings};
use daybreak_runtime::content::GameContent;
use daybreak_runtime::director::Director;
use daybreak_runtime::script::Script;
use daybreak_runtime::session::{StopReason, play};
use daybreak_test_support::{FixedClock, RecordingStage};

#[tokio::test]
async fn test_demo_script_plays_through_to_the_credits() {
    // Arrange
    let (stage, log) = RecordingStage::new().build();
    let mut director = Director::new(
        GameContent::embedded().unwrap(),
        stage,
        Box::new(FixedClock::standard()),
        Box::new(SeededRng::new(DEFAULT_SEED)),
    );
    let script = Script::demo().unwrap();

    // Act
    let summary = play(&mut director, &script, &Settings::default()).await;

    // Assert
    assert_eq!(summary.stop, StopReason::SceneLoaded);
    assert_eq!(summary.inputs, script.entries().len());
    assert_eq!(summary.view.day, 4);
    assert_eq!(summary.view.days_advanced, 3);
    assert!(summary.view.has_card);
    assert_eq!(summary.view.scene_loaded.as_deref(), Some("Credits"));
    assert_eq!(log.scene_loads(), vec!["Credits".to_owned()]);
    assert!(director.is_movement_enabled());
}

#[tokio::test]
async fn test_empty_script_stops_once_the_opening_is_over() {
    // Arrange
    let mut session = Session::new();
    let settings = Settings {
        tick_hz: 4,
        ..Settings::default()
    };

    // Act
    let summary = play(&mut session.director, &Script::default(), &settings).await;

    // Assert
    assert_eq!(summary.stop, StopReason::ScriptFinished);
    assert!(summary.elapsed >= 1.0);
    assert!(summary.elapsed < 2.0);
    assert_eq!(summary.inputs, 0);
    assert_eq!(summary.view.day, 1);
}

#[tokio::test]
async fn test_waiting_special_day_runs_until_the_time_cap() {
    // Arrange
    let (stage, _log) = RecordingStage::new().build();
    let mut director = Director::with_state(
        GameContent::from_yaml(TEST_CONTENT).unwrap(),
        DayState::on_day(4),
        stage,
        Box::new(FixedClock::standard()),
        Box::new(SeededRng::new(7)),
    );
    let settings = Settings {
        tick_hz: 4,
        max_seconds: 5.0,
        ..Settings::default()
    };

    // Act
    let summary = play(&mut director, &Script::default(), &settings).await;

    // Assert
    assert_eq!(summary.stop, StopReason::TimeCap);
    assert_eq!(summary.elapsed, 5.0);
    assert_eq!(summary.ticks, 20);
    assert!(summary.view.scene_loaded.is_none());
}
