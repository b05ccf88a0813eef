//! Configuration file loading, saving and validation

use exercise_alarm::alarm::ExerciseKind;
use exercise_alarm::clock::ManualClock;
use exercise_alarm::config::{Config, EXAMPLE_CONFIG};
use exercise_alarm::controller::AlarmController;
use exercise_alarm::Error;
use std::io::Write;

#[test]
fn test_config_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alarm.yaml");

    let mut config = Config::default();
    config.alarm.exercise = ExerciseKind::Situps;
    config.alarm.target_reps = 25;
    config.reps.refractory_ms = 1200;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.session.target_fps, 15);
    assert_eq!(config.alarm.exercise, ExerciseKind::Pushups);
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"reps: [not, a, map]\n").unwrap();

    match Config::from_file(file.path()) {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Failed to parse config")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_unknown_exercise_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"alarm:\n  exercise: burpees\n").unwrap();
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        Config::from_file("/nonexistent/alarm.yaml"),
        Err(Error::IoError(_))
    ));
}

#[test]
fn test_controller_refuses_invalid_config() {
    let mut config = Config::default();
    config.reps.up_angle = 100.0;
    let result = AlarmController::from_config(&config, Box::new(ManualClock::new()));
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_controller_takes_alarm_defaults() {
    let mut config = Config::default();
    config.alarm.target_reps = 4;
    config.alarm.exercise = ExerciseKind::Situps;
    let controller = AlarmController::from_config(&config, Box::new(ManualClock::new())).unwrap();
    assert_eq!(controller.target_reps(), 4);
    assert_eq!(controller.exercise(), ExerciseKind::Situps);
}
