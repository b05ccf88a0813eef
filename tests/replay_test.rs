//! Replay of recorded pose streams through the full controller

mod test_helpers;

use exercise_alarm::clock::ManualClock;
use exercise_alarm::config::Config;
use exercise_alarm::controller::AlarmController;
use exercise_alarm::session::{parse_recording, read_recording, ReplaySession};
use std::fmt::Write as _;
use std::io::Write as _;
use test_helpers::{good_frame, poor_frame};

const STEP_MS: u64 = 150;

/// Recording with `reps` push-ups starting at `start_ms`, one frame every `STEP_MS`
fn recording(start_ms: u64, reps: usize) -> String {
    let mut text = String::from("# synthetic push-ups\n");
    let mut t = 0;

    while t < start_ms {
        writeln!(text, "{t} -").unwrap();
        t += STEP_MS;
    }

    for _ in 0..reps {
        for angle in [170.0, 80.0, 80.0, 80.0, 80.0, 80.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0] {
            let values: Vec<String> = good_frame(angle).iter().map(ToString::to_string).collect();
            writeln!(text, "{t} {}", values.join(" ")).unwrap();
            t += STEP_MS;
        }
        let values: Vec<String> = poor_frame(90.0).iter().map(ToString::to_string).collect();
        writeln!(text, "{t} {}", values.join(" ")).unwrap();
        t += STEP_MS;
    }
    text
}

fn session(config: &Config) -> ReplaySession {
    let clock = ManualClock::new();
    let controller = AlarmController::from_config(config, Box::new(clock.clone())).unwrap();
    ReplaySession::new(controller, clock, config.session.target_fps)
}

#[test]
fn test_replay_unlocks_after_target() {
    let mut config = Config::default();
    config.alarm.target_reps = 3;

    let frames = parse_recording(&recording(1500, 5)).unwrap();
    let summary = session(&config).run(1.0, &frames);

    assert_eq!(summary.fired_at_ms, Some(1050));
    assert_eq!(summary.reps_counted, 3);
    assert!(summary.stopped_at_ms.is_some());
    assert!(summary.ignored > 0);
    assert!(summary.rejected > 0);
    assert!(summary.frames < frames.len());
}

#[test]
fn test_replay_without_enough_reps_keeps_ringing() {
    let mut config = Config::default();
    config.alarm.target_reps = 10;

    let frames = parse_recording(&recording(300, 2)).unwrap();
    let mut replay = session(&config);
    let summary = replay.run(0.0, &frames);

    assert_eq!(summary.fired_at_ms, Some(1050));
    assert_eq!(summary.stopped_at_ms, None);
    assert!(summary.reps_counted < 10);
    assert_eq!(summary.frames, frames.len());
    assert!(summary.to_string().contains("still ringing"));
    assert_eq!(
        replay.controller().status(),
        exercise_alarm::alarm::AlarmStatus::Ringing
    );
}

#[test]
fn test_replay_throttles_dense_stream() {
    let mut text = String::new();
    for t in (0..3000).step_by(10) {
        writeln!(text, "{t} -").unwrap();
    }
    let frames = parse_recording(&text).unwrap();

    let mut config = Config::default();
    config.session.target_fps = 10;
    let summary = session(&config).run(1.0, &frames);

    assert_eq!(summary.frames, 300);
    assert_eq!(summary.throttled, 270);
    assert_eq!(summary.fired_at_ms, Some(1000));
}

#[test]
fn test_read_recording_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(recording(0, 1).as_bytes()).unwrap();

    let frames = read_recording(file.path()).unwrap();
    assert_eq!(frames.len(), 14);
    assert!(frames.iter().all(|f| f.values.is_some()));
}

#[test]
fn test_read_recording_missing_file() {
    assert!(read_recording("/nonexistent/recording.txt").is_err());
}
